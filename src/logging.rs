use std::io::{Error, ErrorKind};
use std::sync::OnceLock;

static MESSENGER: OnceLock<Box<dyn Messenger>> = OnceLock::new();

#[macro_export]
macro_rules! message {
    ($($arg:tt)*) => {
        $crate::logging::messenger().message(&format!($($arg)*))
    };
}

pub fn set_boxed_messenger(logger: Box<dyn Messenger>) -> std::io::Result<()> {
    match MESSENGER.set(logger) {
        Ok(()) => Ok(()),
        Err(_) => Err(Error::new(ErrorKind::Other, "failed to set messenger")),
    }
}

pub fn messenger() -> &'static dyn Messenger {
    static NOP: NopMessenger = NopMessenger;
    match MESSENGER.get() {
        Some(m) => m.as_ref(),
        None => &NOP,
    }
}

pub trait ProgressBytes {
    fn progress_bytes(&self, bytes: u64);
    fn finish(&self);
}

pub trait ProgressPercent {
    fn progress_percent(&self, percent: f64);
    fn finish(&self);
}

pub trait Messenger: Send + Sync {
    fn message(&self, message: &str);

    fn start_progress_bytes(&self, message: &str, total_bytes: u64) -> Box<dyn ProgressBytes>;
    fn start_progress_percent(&self, message: &str) -> Box<dyn ProgressPercent>;
}

struct NopProgress;
impl ProgressBytes for NopProgress {
    fn progress_bytes(&self, _bytes: u64) {}
    fn finish(&self) {}
}
impl ProgressPercent for NopProgress {
    fn progress_percent(&self, _percent: f64) {}
    fn finish(&self) {}
}

struct NopMessenger;
impl Messenger for NopMessenger {
    fn message(&self, _message: &str) {}

    fn start_progress_bytes(&self, _message: &str, _total_bytes: u64) -> Box<dyn ProgressBytes> {
        Box::new(NopProgress)
    }
    fn start_progress_percent(&self, _message: &str) -> Box<dyn ProgressPercent> {
        Box::new(NopProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nop_messenger_progress() {
        let m = NopMessenger;
        m.message("ignored");

        let pb = m.start_progress_bytes("bytes", 100);
        pb.progress_bytes(50);
        pb.finish();

        let pp = m.start_progress_percent("percent");
        pp.progress_percent(50.0);
        pp.finish();
    }
}
