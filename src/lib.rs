pub mod admin;
pub mod client;
pub mod error;
pub mod filter;
pub mod render;
pub mod settings;
pub mod structures;
pub mod theme;
pub mod view;

pub use admin::{AdminPanel, Confirm, DeleteOutcome, NoticeForm};
pub use client::NoticeClient;
pub use error::NoticeError;
pub use settings::Settings;
pub use structures::{NewNotice, Notice, NoticeId};
pub use view::{Query, View, ViewKind, ViewState};
