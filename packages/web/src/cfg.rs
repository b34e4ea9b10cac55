/// Configuration for the web-sys display backend.
///
/// This struct picks the element the application is mounted into and how listeners are registered with the
/// browser.
///
/// # Example
///
/// ```rust, ignore
/// trellis_web::launch(Config::new().rootname("app"), view(&model), sink)
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) rootname: String,
    pub(crate) passive_listeners: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rootname: "main".to_string(),
            passive_listeners: true,
        }
    }
}

impl Config {
    /// Create a new config with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id of the element trellis will mount the application into.
    ///
    /// Defaults to `main`.
    pub fn rootname(mut self, name: impl Into<String>) -> Self {
        self.rootname = name.into();
        self
    }

    /// Register listeners whose handlers can never prevent the default action as passive.
    ///
    /// Passive listeners let the browser scroll without waiting for the handler. Enabled by default.
    pub fn passive_listeners(mut self, passive: bool) -> Self {
        self.passive_listeners = passive;
        self
    }
}
