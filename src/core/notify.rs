/*
 * User-visible notification sink, fire-and-forget. All error surfacing from
 * the session goes through here so the presentation (message box, status
 * bar, terminal) stays swappable.
 */

pub trait NotificationServiceOperations: Send + Sync {
    fn show(&self, message: &str, title: &str);
}

pub struct CoreNotificationService {}

impl CoreNotificationService {
    pub fn new() -> Self {
        CoreNotificationService {}
    }
}

impl Default for CoreNotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationServiceOperations for CoreNotificationService {
    fn show(&self, message: &str, title: &str) {
        log::debug!("CoreNotificationService: [{title}] {message}");
        eprintln!("[{title}] {message}");
    }
}
