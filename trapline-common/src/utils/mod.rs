// private sub-module defined in other files
mod byte_order_reader;
mod byte_order_writer;

// exports identifiers from private sub-modules in the current module namespace
pub use self::byte_order_reader::ByteOrderReader;
pub use self::byte_order_reader::Endianness;
pub use self::byte_order_writer::ByteOrderWriter;

use std::time::Instant;

/// Returns a formatted string of elapsed time, e.g.
/// `1min 34.852s`
pub fn get_formatted_elapsed_time(instant: Instant) -> String {
    let dur = instant.elapsed();
    let minutes = dur.as_secs() / 60;
    let sub_sec = dur.as_secs() % 60;
    let sub_milli = dur.subsec_millis();
    if minutes > 0 {
        return format!("{}min {}.{:03}s", minutes, sub_sec, sub_milli);
    }
    format!("{}.{:03}s", sub_sec, sub_milli)
}

/// Prints the tool's welcome banner, sized to the tool name.
pub fn print_welcome_banner(tool_name: &str) {
    let welcome_len = format!("* Welcome to {} *", tool_name).len().max(28);
    // 28 = length of the 'Powered by' statement.
    println!("{}", "*".repeat(welcome_len));
    println!(
        "* Welcome to {} {}*",
        tool_name,
        " ".repeat(welcome_len - 15 - tool_name.len())
    );
    println!("* Powered by TraplineTools {}*", " ".repeat(welcome_len - 28));
    println!("{}", "*".repeat(welcome_len));
}

/// Tracks percentage progress and prints it when it changes.
pub struct ProgressReporter {
    total: usize,
    old_progress: usize,
    verbose: bool,
    label: String,
}

impl ProgressReporter {
    pub fn new(label: &str, total: usize, verbose: bool) -> ProgressReporter {
        ProgressReporter {
            total: total,
            old_progress: usize::MAX,
            verbose: verbose,
            label: label.to_string(),
        }
    }

    pub fn update(&mut self, completed: usize) {
        if !self.verbose || self.total == 0 {
            return;
        }
        let progress = (100.0_f64 * completed as f64 / self.total as f64) as usize;
        if progress != self.old_progress {
            println!("{}: {}%", self.label, progress);
            self.old_progress = progress;
        }
    }
}

#[cfg(test)]
mod test {
    use super::get_formatted_elapsed_time;
    use std::time::Instant;

    #[test]
    fn test_elapsed_time_format() {
        let s = get_formatted_elapsed_time(Instant::now());
        assert!(s.ends_with('s'));
        assert!(!s.contains("min"));
    }
}
