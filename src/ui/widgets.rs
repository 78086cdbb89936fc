use iced::widget::{button, container, text, Button};
use iced::{Element, Length};

/// Width of the main card
const CARD_WIDTH: f32 = 480.0;

/// Rounded, padded box that holds the whole form
pub fn card<'a, Message: 'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(24)
        .width(Length::Fill)
        .max_width(CARD_WIDTH)
        .style(container::rounded_box)
        .into()
}

/// Primary action button; disabled when `on_press` is `None`
pub fn primary_button<'a, Message: Clone + 'a>(
    label: &'a str,
    on_press: Option<Message>,
) -> Button<'a, Message> {
    button(text(label).size(16))
        .padding([10, 20])
        .style(button::primary)
        .on_press_maybe(on_press)
}

/// Secondary action, e.g. cancel
pub fn secondary_button<'a, Message: Clone + 'a>(label: &'a str, on_press: Message) -> Button<'a, Message> {
    button(text(label).size(16))
        .padding([10, 20])
        .style(button::secondary)
        .on_press(on_press)
}
