/// Snapshot of a transfer in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub bytes_downloaded: u64,
    pub total_bytes:      Option<u64>,
}

impl Progress {
    pub fn new(bytes_downloaded: u64, total_bytes: Option<u64>) -> Self {
        Self {
            bytes_downloaded,
            total_bytes,
        }
    }
}
