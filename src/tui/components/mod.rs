//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: chat header with the user's name
//! - `Bubble`: one message
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: single-line text field (name gate and composer)
//! - `MessageList`: scrollable chat with stick-to-bottom
//! - `NameGate`: the first screen, wraps an `InputBox`
//!
//! Components receive external data as props, never by reaching into
//! global state, which keeps them testable against `TestBackend`.

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod name_gate;
pub mod title_bar;

pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use name_gate::NameGate;
pub use title_bar::TitleBar;
