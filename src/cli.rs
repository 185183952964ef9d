//! Command line interface for the `shmtap` subscriber binary.
//!
//! Carries the transport connection parameters plus the operational policy
//! knobs the poll loop exposes.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Idle strategies selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IdleMode {
    /// Burn the core and never wait.
    Busy,
    /// Spin, then yield, then sleep progressively longer.
    Backoff,
}

/// Command line arguments for the `shmtap` binary.
#[derive(Debug, Parser)]
#[command(
    name = "shmtap",
    version,
    about = "Subscribe to a shared-memory feed and print received messages"
)]
pub struct Cli {
    /// IPC directory of the transport driver.
    #[arg(long, default_value = "/dev/shm/shmtap")]
    pub dir: PathBuf,

    /// Channel address to subscribe to.
    #[arg(long, default_value = "shm:ipc")]
    pub channel: String,

    /// Numeric stream identifier within the channel.
    #[arg(long, default_value_t = 5000)]
    pub stream_id: i32,

    /// Seconds to wait for the driver before giving up.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Keep running when a recognised message fails to decode instead of
    /// exiting.
    #[arg(long)]
    pub skip_malformed: bool,

    /// Wait policy for polls that return no fragments.
    #[arg(long, value_enum, default_value_t = IdleMode::Busy)]
    pub idle: IdleMode,

    /// Seconds granted to the poll loop to stop after a signal.
    #[arg(long, default_value_t = 10)]
    pub grace_secs: u64,

    /// Publish this many synthetic messages per second on the loopback
    /// transport (0 disables the demo publisher).
    #[arg(long, default_value_t = 0)]
    pub demo_rate: u32,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, IdleMode};

    #[test]
    fn defaults_are_usable_without_flags() {
        let cli = Cli::parse_from(["shmtap"]);
        assert_eq!(cli.channel, "shm:ipc");
        assert_eq!(cli.stream_id, 5000);
        assert_eq!(cli.timeout_secs, 30);
        assert_eq!(cli.grace_secs, 10);
        assert_eq!(cli.idle, IdleMode::Busy);
        assert!(!cli.skip_malformed);
    }

    #[test]
    fn parses_policy_overrides() {
        let cli = Cli::parse_from([
            "shmtap",
            "--stream-id",
            "6001",
            "--skip-malformed",
            "--idle",
            "backoff",
        ]);
        assert_eq!(cli.stream_id, 6001);
        assert!(cli.skip_malformed);
        assert_eq!(cli.idle, IdleMode::Backoff);
    }
}
