/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// The catalog could not be fetched, a download failed or the run aborted.
    Failed,
    BlacklistUnreadable,
    UnknownModList,
    MissingModList,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failed => -1,
            ExitStatus::BlacklistUnreadable => -2,
            ExitStatus::UnknownModList => -3,
            ExitStatus::MissingModList => -4,
        }
    }
}
