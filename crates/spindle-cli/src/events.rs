use crate::script::Command;
use spindle::config::ConfigReload;

#[derive(Debug, Clone)]
pub enum DriverEvent {
    Command(Command),
    Frame,
    ConfigReload,
    /// Input reached end of file.
    Closed,
}

impl From<ConfigReload> for DriverEvent {
    fn from(_: ConfigReload) -> Self {
        Self::ConfigReload
    }
}
