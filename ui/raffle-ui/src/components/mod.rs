pub mod admin_controls;
pub mod countdown_timer;
pub mod draw_stats;
pub mod layout;
pub mod loading;
pub mod login;
pub mod ticket_purchase;
pub mod toaster;
pub mod winner_marquee;
pub mod winnings;
