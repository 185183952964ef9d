//! Connection parameters for the transport boundary.

use std::{path::PathBuf, time::Duration};

/// Everything needed to connect to a transport driver and name the default
/// subscription target.
#[derive(Clone, Debug)]
pub struct ConnectOptions {
    /// IPC directory the driver and clients share.
    pub dir: PathBuf,
    /// Logical channel address.
    pub channel: String,
    /// Numeric stream identifier within the channel.
    pub stream_id: i32,
    /// How long to wait for the driver before giving up.
    pub timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/dev/shm/shmtap"),
            channel: "shm:ipc".to_owned(),
            stream_id: 5000,
            timeout: Duration::from_secs(30),
        }
    }
}
