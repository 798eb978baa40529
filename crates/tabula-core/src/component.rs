use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable piece of UI state that renders into a given [`Rect`].
///
/// A component owns its local state exclusively (an edit buffer, a sort
/// state, a selection set) and mutates it only inside
/// [`update`](Component::update). Anything the owner needs to know about is
/// reported back as a message through the returned [`Command`].
///
/// # Composition pattern
///
/// Wrap the component's message type in a variant of the parent message and
/// lift commands with [`Command::map`]. Reported events come back through the
/// parent's `update`, where they can be matched before being forwarded:
///
/// ```rust,ignore
/// use tabula_core::{Command, Component, Model};
/// use tabula_widgets::field::{self, Field};
///
/// struct App { email: Field, last: String }
///
/// enum Msg { Email(field::Message) }
///
/// impl Model for App {
///     // ...
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Email(field::Message::Changed(value)) => {
///                 self.last = value;
///                 Command::none()
///             }
///             Msg::Email(m) => self.email.update(m).map(Msg::Email),
///         }
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's message type, covering both incoming events and the
    /// events it reports to its owner.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations confine all drawing to the rectangle.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Active subscriptions (animation ticks and the like).
    ///
    /// The parent collects these and includes them in its own
    /// [`Model::subscriptions`](crate::Model::subscriptions), mapping the
    /// message type.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has keyboard focus.
    fn focused(&self) -> bool {
        false
    }
}
