pub mod mailer;

pub use mailer::{
    dispatch_best_effort, EmailKind, LogMailer, Mailer, MemoryMailer, NotificationError,
    OutboundEmail,
};
