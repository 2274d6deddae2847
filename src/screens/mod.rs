pub mod profile;
pub mod shopping_list;

use crate::app::Message;
use basket_kv::{Alert, AlertLevel};
use iced::widget::{button, column, container, row, text};
use iced::{Element, Length};

/// Shown while a store is still loading
pub fn loading<'a>() -> Element<'a, Message> {
    container(text("Loading..."))
        .center(Length::Fill)
        .into()
}

/// The oldest undismissed alert
pub fn alert_banner(alert: &Alert) -> Element<'_, Message> {
    let title = text(&alert.title).size(18).style(match alert.level {
        AlertLevel::Info => text::success,
        AlertLevel::Error => text::danger,
    });
    let body = column![title, text(&alert.message).size(14)]
        .spacing(4)
        .width(Length::Fill);

    container(
        row![body, button("OK").on_press(Message::DismissAlert)]
            .spacing(10)
            .align_y(iced::Center),
    )
    .style(container::rounded_box)
    .padding(12)
    .width(Length::Fill)
    .into()
}
