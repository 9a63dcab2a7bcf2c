/// Thumbnail grid
///
/// Renders the selection as a wrapping grid of draggable tiles. Tiles
/// send their stable image id; the update loop resolves it to an index.
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, mouse_area, scrollable, text};
use iced::{Alignment, Border, ContentFit, Element, Length, Pixels, Theme};
use iced_aw::Wrap;

use crate::state::data::ImageRef;
use crate::state::session::Session;
use crate::Message;

/// Border treatment of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Idle,
    /// The tile being dragged
    Source,
    /// The tile a drop would land on
    Target,
}

pub fn highlight_for(session: &Session, index: usize) -> Highlight {
    let reorder = session.reorder();
    if reorder.is_source(index) {
        Highlight::Source
    } else if reorder.is_target(index) {
        Highlight::Target
    } else {
        Highlight::Idle
    }
}

pub fn view(session: &Session, thumbnail_size: u16) -> Element<'_, Message> {
    let selection = session.selection();

    let body: Element<'_, Message> = if selection.is_empty() {
        container(text("No images selected yet").size(14))
            .center(Length::Fill)
            .into()
    } else {
        let tiles: Vec<Element<'_, Message>> = selection
            .iter()
            .enumerate()
            .map(|(index, image)| tile(image, highlight_for(session, index), thumbnail_size))
            .collect();

        let grid = Wrap::with_elements(tiles)
            .spacing(Pixels(10.0))
            .line_spacing(Pixels(10.0));

        scrollable(container(grid).padding(10).width(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    };

    container(body)
        .padding(5)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(panel_style)
        .into()
}

fn tile(image_ref: &ImageRef, highlight: Highlight, size: u16) -> Element<'_, Message> {
    let id = image_ref.id();

    let content = column![
        image(Handle::from_path(image_ref.path()))
            .width(size)
            .height(size)
            .content_fit(ContentFit::Contain),
        text(image_ref.display_name()).size(12),
        button(text("Delete").size(12))
            .on_press(Message::RemoveImage(id))
            .padding(4)
            .style(button::danger),
    ]
    .spacing(6)
    .align_x(Alignment::Center);

    let framed = container(content)
        .padding(10)
        .width(size + 20)
        .style(move |theme: &Theme| tile_style(theme, highlight));

    mouse_area(framed)
        .on_press(Message::DragStart(id))
        .on_enter(Message::DragOver(id))
        .on_exit(Message::DragLeave(id))
        .on_release(Message::Drop(id))
        .into()
}

fn tile_style(theme: &Theme, highlight: Highlight) -> container::Style {
    let palette = theme.extended_palette();
    let (color, width) = match highlight {
        Highlight::Idle => (palette.background.strong.color, 1.0),
        Highlight::Source => (palette.primary.strong.color, 2.0),
        Highlight::Target => (palette.success.strong.color, 2.0),
    };

    container::Style {
        border: Border {
            color,
            width,
            radius: 10.0.into(),
        },
        ..container::Style::default()
    }
}

fn panel_style(theme: &Theme) -> container::Style {
    container::Style {
        border: Border {
            color: theme.extended_palette().background.weak.color,
            width: 1.0,
            radius: 10.0.into(),
        },
        ..container::Style::default()
    }
}
