use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait.
///
/// The runtime drives an **init -> view -> update** cycle: [`init`](Model::init)
/// builds the state, [`view`](Model::view) draws it, and every event that
/// arrives (terminal input, timer ticks, messages reported by child
/// components) goes through [`update`](Model::update). The cycle repeats until
/// `update` returns [`Command::quit`].
///
/// # Example
///
/// ```rust,ignore
/// use tabula_core::{Command, Model};
/// use ratatui::Frame;
/// use ratatui::widgets::Paragraph;
///
/// struct Greeting { name: String }
///
/// enum Msg { Rename(String) }
///
/// impl Model for Greeting {
///     type Message = Msg;
///     type Flags = String;
///
///     fn init(name: String) -> (Self, Command<Msg>) {
///         (Greeting { name }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Rename(name) => self.name = name,
///         }
///         Command::none()
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         frame.render_widget(Paragraph::new(format!("Hello, {}", self.name)), frame.area());
///     }
/// }
/// ```
pub trait Model: Sized + Send + 'static {
    /// The application's message type.
    type Message: Send + 'static;

    /// Data passed to [`init`](Model::init) when the program starts.
    type Flags: Send + 'static;

    /// Build the initial state.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message and return follow-up work.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Draw the whole frame.
    fn view(&self, frame: &mut Frame);

    /// Event sources the model is interested in. Re-evaluated after every
    /// update; the runtime starts new subscriptions and stops vanished ones.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
