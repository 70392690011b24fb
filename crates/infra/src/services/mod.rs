mod telegram;

pub use telegram::{INotificationChannel, NoopChannel, TelegramChannel};
