//! Composition root: owns the stores and routes user intents to them

use crate::screens;
use basket_kv::{Alert, KeyValueStore, PendingSave, Rejected, StorageError};
use basket_profile::{ProfileField, ProfileStore};
use basket_shopping_list::{Confirmation, ShoppingList};
use basket_theme::{ThemeContext, ThemeMode};
use iced::widget::{button, column, row, text};
use iced::{Element, Length, Task, Theme};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    ShoppingList,
    Profile,
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    DismissAlert,

    // Shopping list
    ListLoaded(Result<Option<String>, StorageError>),
    ListSaved(Result<(), StorageError>),
    ItemInputChanged(String),
    AddItem,
    ToggleItem(String),
    RequestDelete(String),
    ResolveDelete(Confirmation),

    // Profile
    ProfileLoaded(Result<Option<String>, StorageError>),
    ProfileSaved(Result<(), StorageError>),
    ToggleEditing,
    FieldChanged(ProfileField, String),
    SaveProfile,
    ToggleNotifications,

    // Theme
    ToggleTheme,
    ThemeSaved(ThemeMode),
}

pub struct App {
    theme: ThemeContext,
    shopping_list: ShoppingList,
    profile: ProfileStore,
    tab: Tab,
    item_input: String,
    alerts: Vec<Alert>,
}

impl App {
    pub fn new(store: Arc<dyn KeyValueStore>, theme: ThemeContext) -> (Self, Task<Message>) {
        let mut app = Self {
            theme,
            shopping_list: ShoppingList::new(Arc::clone(&store)),
            profile: ProfileStore::new(store),
            tab: Tab::default(),
            item_input: String::new(),
            alerts: Vec::new(),
        };

        let load_list = app
            .shopping_list
            .begin_load()
            .map(|pending| Task::perform(pending.run(), Message::ListLoaded))
            .unwrap_or_else(Task::none);
        let load_profile = app
            .profile
            .begin_load()
            .map(|pending| Task::perform(pending.run(), Message::ProfileLoaded))
            .unwrap_or_else(Task::none);

        (app, Task::batch([load_list, load_profile]))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                Task::none()
            }
            Message::DismissAlert => {
                if !self.alerts.is_empty() {
                    self.alerts.remove(0);
                }
                Task::none()
            }

            Message::ListLoaded(result) => {
                self.shopping_list.finish_load(result);
                Task::none()
            }
            Message::ListSaved(result) => {
                self.shopping_list.finish_save(result);
                Task::none()
            }
            Message::ItemInputChanged(value) => {
                self.item_input = value;
                Task::none()
            }
            Message::AddItem => match self.shopping_list.add_item(&self.item_input) {
                Ok(save) => {
                    self.item_input.clear();
                    persist(save, Message::ListSaved)
                }
                Err(rejected) => ignored(rejected),
            },
            Message::ToggleItem(id) => match self.shopping_list.toggle_item(&id) {
                Ok(save) => persist(save, Message::ListSaved),
                Err(rejected) => ignored(rejected),
            },
            Message::RequestDelete(id) => match self.shopping_list.request_delete(&id) {
                Ok(()) => Task::none(),
                Err(rejected) => ignored(rejected),
            },
            Message::ResolveDelete(confirmation) => {
                match self.shopping_list.resolve_delete(confirmation) {
                    Ok(save) => persist(save, Message::ListSaved),
                    Err(rejected) => ignored(rejected),
                }
            }

            Message::ProfileLoaded(result) => {
                self.profile.finish_load(result);
                Task::none()
            }
            Message::ProfileSaved(result) => {
                self.profile.finish_save(result);
                Task::none()
            }
            Message::ToggleEditing => match self.profile.toggle_editing() {
                Ok(_) => Task::none(),
                Err(rejected) => ignored(rejected),
            },
            Message::FieldChanged(field, value) => match self.profile.update_field(field, value) {
                Ok(()) => Task::none(),
                Err(rejected) => ignored(rejected),
            },
            Message::SaveProfile => match self.profile.save() {
                Ok(save) => persist(save, Message::ProfileSaved),
                Err(rejected) => ignored(rejected),
            },
            Message::ToggleNotifications => match self.profile.toggle_notifications() {
                Ok(_) => Task::none(),
                Err(rejected) => ignored(rejected),
            },

            Message::ToggleTheme => Task::perform(self.theme.toggle(), Message::ThemeSaved),
            Message::ThemeSaved(mode) => {
                tracing::debug!(%mode, "theme preference persisted");
                Task::none()
            }
        };

        self.alerts.extend(self.shopping_list.take_alerts());
        self.alerts.extend(self.profile.take_alerts());
        task
    }

    pub fn view(&self) -> Element<'_, Message> {
        let tabs = row![
            tab_button("List", Tab::ShoppingList, self.tab),
            tab_button("Profile", Tab::Profile, self.tab),
        ]
        .spacing(10);

        let screen = match self.tab {
            Tab::ShoppingList => screens::shopping_list::view(&self.shopping_list, &self.item_input),
            Tab::Profile => screens::profile::view(&self.profile, &self.theme),
        };

        let mut content = column![tabs].spacing(16).padding(20);
        if let Some(alert) = self.alerts.first() {
            content = content.push(screens::alert_banner(alert));
        }

        content
            .push(screen)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        match self.theme.mode() {
            ThemeMode::Light => Theme::Light,
            ThemeMode::Dark => Theme::Dark,
        }
    }
}

fn tab_button(label: &str, tab: Tab, current: Tab) -> Element<'_, Message> {
    let style: fn(&Theme, button::Status) -> button::Style = if tab == current {
        button::primary
    } else {
        button::secondary
    };
    button(text(label))
        .style(style)
        .on_press(Message::TabSelected(tab))
        .into()
}

/// Hand a store write to the executor
fn persist(
    save: Option<PendingSave>,
    done: fn(Result<(), StorageError>) -> Message,
) -> Task<Message> {
    match save {
        Some(save) => Task::perform(save.run(), done),
        None => Task::none(),
    }
}

fn ignored(rejected: Rejected) -> Task<Message> {
    tracing::debug!(%rejected, "intent ignored");
    Task::none()
}
