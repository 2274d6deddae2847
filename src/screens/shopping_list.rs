use super::loading;
use crate::app::Message;
use basket_shopping_list::{Confirmation, ShoppingItem, ShoppingList};
use iced::widget::{Column, button, column, container, row, scrollable, text, text_input};
use iced::{Element, Length};

pub fn view<'a>(list: &'a ShoppingList, input: &'a str) -> Element<'a, Message> {
    if !list.is_ready() {
        return loading();
    }

    let add = row![
        text_input("Add an item...", input)
            .on_input(Message::ItemInputChanged)
            .on_submit(Message::AddItem)
            .width(Length::Fill),
        button("Add").on_press(Message::AddItem),
    ]
    .spacing(10);

    let mut content = column![add].spacing(16);

    if let Some(item) = list.pending_delete() {
        content = content.push(confirm_delete(item));
    }

    let items: Element<'a, Message> = if list.items().is_empty() {
        column![
            text("Your shopping list is empty").size(18),
            text("Use the field above to add an item").size(14),
        ]
        .spacing(6)
        .into()
    } else {
        scrollable(Column::with_children(list.items().iter().map(item_row)).spacing(6))
            .height(Length::Fill)
            .into()
    };

    content
        .push(text(format!(
            "{} of {} left",
            list.remaining(),
            list.items().len()
        )))
        .push(items)
        .into()
}

fn item_row(item: &ShoppingItem) -> Element<'_, Message> {
    let label = if item.completed {
        format!("✓ {}", item.name)
    } else {
        item.name.clone()
    };

    row![
        button(text(label))
            .style(if item.completed {
                button::text
            } else {
                button::secondary
            })
            .width(Length::Fill)
            .on_press(Message::ToggleItem(item.id.clone())),
        button("Delete")
            .style(button::danger)
            .on_press(Message::RequestDelete(item.id.clone())),
    ]
    .spacing(10)
    .into()
}

fn confirm_delete(item: &ShoppingItem) -> Element<'_, Message> {
    container(
        column![
            text("Delete item").size(18),
            text(format!("Are you sure you want to delete \"{}\"?", item.name)),
            row![
                button("Cancel")
                    .style(button::secondary)
                    .on_press(Message::ResolveDelete(Confirmation::Declined)),
                button("Delete")
                    .style(button::danger)
                    .on_press(Message::ResolveDelete(Confirmation::Confirmed)),
            ]
            .spacing(10),
        ]
        .spacing(8),
    )
    .style(container::rounded_box)
    .padding(12)
    .width(Length::Fill)
    .into()
}
