use super::loading;
use crate::app::Message;
use basket_profile::{ProfileField, ProfileStore};
use basket_theme::ThemeContext;
use iced::widget::{Column, button, column, container, row, scrollable, text, text_input};
use iced::{Element, Length};

pub fn view<'a>(store: &'a ProfileStore, theme: &ThemeContext) -> Element<'a, Message> {
    if !store.is_ready() {
        return loading();
    }

    let profile = store.profile();
    let editing = store.is_editing();

    let header = column![
        container(text(profile.initial()).size(32))
            .style(container::rounded_box)
            .padding(20),
        text(profile.display_name()).size(22),
    ]
    .spacing(10)
    .align_x(iced::Center)
    .width(Length::Fill);

    let fields = Column::with_children(ProfileField::ALL.into_iter().map(|field| {
        let mut input = text_input(field.placeholder(), profile.field(field));
        if editing {
            input = input.on_input(move |value| Message::FieldChanged(field, value));
        }
        column![text(field.label()).size(14), input].spacing(4).into()
    }))
    .spacing(12);

    let mut personal = column![
        row![
            text("Personal information").size(18).width(Length::Fill),
            button(if editing { "Cancel" } else { "Edit" })
                .style(button::text)
                .on_press(Message::ToggleEditing),
        ],
        fields,
    ]
    .spacing(12);

    if editing {
        personal = personal.push(
            button("Save")
                .width(Length::Fill)
                .on_press(Message::SaveProfile),
        );
    }

    let preferences = column![
        text("Preferences").size(18),
        switch(
            "Notifications",
            profile.preferences.notifications,
            Message::ToggleNotifications
        ),
        switch("Dark mode", theme.is_dark(), Message::ToggleTheme),
    ]
    .spacing(12);

    let about = column![
        text("About").size(18),
        text("Basket v0.1").size(14),
    ]
    .spacing(6);

    scrollable(column![header, personal, preferences, about].spacing(24))
        .height(Length::Fill)
        .into()
}

fn switch<'a>(label: &'a str, on: bool, message: Message) -> Element<'a, Message> {
    row![
        text(label).width(Length::Fill),
        button(if on { "On" } else { "Off" })
            .style(if on { button::primary } else { button::secondary })
            .on_press(message),
    ]
    .spacing(10)
    .into()
}
