pub const EXTENSION_NAME: &str = "SVN Blamer";

pub const LOADING_ICON: &str = "loading~spin";

/// Single-line status text shown by the editor host.
pub trait StatusIndicator: Send + Sync {
    fn set_text(&self, text: &str);
    fn show(&self);
    fn hide(&self);
}

/// User-visible error notifications.
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
}

pub fn status_text(message: &str, icon: Option<&str>) -> String {
    let prefix = format!("{}:", EXTENSION_NAME);
    let icon = icon
        .filter(|icon| !icon.is_empty())
        .map(|icon| format!("$({})", icon));

    icon.iter()
        .map(String::as_str)
        .chain([prefix.as_str(), message])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn generic_failure_message() -> String {
    format!("{}: Something went wrong", EXTENSION_NAME)
}

/// Shows a spinning status while alive and hides it when dropped.
pub struct BusyIndicator<'a> {
    status: &'a dyn StatusIndicator,
}

impl<'a> BusyIndicator<'a> {
    pub fn begin(status: &'a dyn StatusIndicator, message: &str) -> Self {
        status.show();
        status.set_text(&status_text(message, Some(LOADING_ICON)));
        Self { status }
    }
}

impl Drop for BusyIndicator<'_> {
    fn drop(&mut self) {
        self.status.hide();
    }
}
