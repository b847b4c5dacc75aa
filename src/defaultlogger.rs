use indicatif::{ProgressBar, ProgressStyle};
use crate::logging::{set_boxed_messenger, Messenger, ProgressBytes, ProgressPercent};

fn bar_style(template: &str) -> ProgressStyle {
    match ProgressStyle::default_bar().template(template) {
        Ok(s) => s.progress_chars("#>-"),
        Err(_) => ProgressStyle::default_bar(),
    }
}

pub struct ProgressBytesDefault {
    pb: ProgressBar,
}

impl ProgressBytesDefault {
    pub fn new(message: &str, total_bytes: u64) -> Box<dyn ProgressBytes> {
        let pb = ProgressBar::new(total_bytes);
        pb.set_style(bar_style(
            "{spinner:.green} [{elapsed_precise}] [{bar:60.cyan/blue}] {bytes} / {total_bytes} ({eta_precise}) {msg}",
        ));
        pb.set_message(message.to_string());

        Box::new(ProgressBytesDefault { pb })
    }
}

impl ProgressBytes for ProgressBytesDefault {
    fn progress_bytes(&self, bytes: u64) {
        self.pb.set_position(bytes);
    }

    fn finish(&self) {
        self.pb.finish();
    }
}

pub struct ProgressPercentDefault {
    pb: ProgressBar,
}

impl ProgressPercentDefault {
    pub fn new(message: &str) -> Box<dyn ProgressPercent> {
        let pb = ProgressBar::new(1000);
        pb.set_style(bar_style(
            "{spinner:.green} [{elapsed_precise}] [{bar:60.cyan/blue}] {percent:>4}% ({eta_precise}) {msg}",
        ));
        pb.set_message(message.to_string());

        Box::new(ProgressPercentDefault { pb })
    }
}

impl ProgressPercent for ProgressPercentDefault {
    fn progress_percent(&self, percent: f64) {
        self.pb.set_position((percent * 10.0) as u64);
    }

    fn finish(&self) {
        self.pb.finish();
    }
}

/// Writes messages to stderr, so that json written to stdout stays clean.
pub struct MessengerDefault;

impl MessengerDefault {
    pub fn new() -> MessengerDefault {
        MessengerDefault
    }
}

impl Messenger for MessengerDefault {
    fn message(&self, message: &str) {
        for (i, l) in message.split('\n').enumerate() {
            eprintln!("{} {}", if i == 0 { "MSG:" } else { "    " }, l);
        }
    }

    fn start_progress_bytes(&self, message: &str, total_bytes: u64) -> Box<dyn ProgressBytes> {
        ProgressBytesDefault::new(message, total_bytes)
    }

    fn start_progress_percent(&self, message: &str) -> Box<dyn ProgressPercent> {
        ProgressPercentDefault::new(message)
    }
}

pub fn register_messenger_default() -> std::io::Result<()> {
    set_boxed_messenger(Box::new(MessengerDefault::new()))
}
