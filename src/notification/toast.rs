#[cfg(all(feature = "toast", target_os = "macos"))]
pub fn prepare() {
    match notify_rust::set_application(data::environment::APPLICATION_ID) {
        Ok(()) => {}
        Err(error) => {
            log::error!("{error}");
        }
    }
}

#[cfg(not(all(feature = "toast", target_os = "macos")))]
pub fn prepare() {}

#[cfg(feature = "toast")]
pub fn show(title: &str, body: &str) {
    let mut notification = notify_rust::Notification::new();

    notification.summary(title);
    notification.body(body);

    #[cfg(target_os = "linux")]
    {
        notification.appname("Hark");
        notification.icon(data::environment::APPLICATION_ID);
    }
    #[cfg(target_os = "windows")]
    {
        notification.app_id(data::environment::APPLICATION_ID);
    }

    if let Err(error) = notification.show() {
        log::warn!("failed to show notification: {error}");
    }
}

#[cfg(not(feature = "toast"))]
pub fn show(title: &str, body: &str) {
    log::info!("notification: {title}: {body}");
}
