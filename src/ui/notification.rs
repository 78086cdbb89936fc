use iced::widget::{button, center, column, container, opaque, stack, text};
use iced::{Color, Element};

/// A message the user has to acknowledge before continuing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Draw `notice` over `base`, swallowing all input to it until dismissed
pub fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    notice: &'a Notice,
    on_dismiss: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let dialog = container(
        column![
            text(&notice.title).size(20),
            text(&notice.message).size(14),
            button(text("OK")).padding([6, 18]).on_press(on_dismiss),
        ]
        .spacing(16),
    )
    .width(360)
    .padding(20)
    .style(container::rounded_box);

    let backdrop = center(opaque(dialog)).style(|_theme| container::Style {
        background: Some(
            Color {
                a: 0.6,
                ..Color::BLACK
            }
            .into(),
        ),
        ..container::Style::default()
    });

    stack![base.into(), opaque(backdrop)].into()
}
