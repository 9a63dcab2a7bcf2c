use iced::widget::{button, column, container, progress_bar, row, text, Column};
use iced::{event, mouse, time, Alignment, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Duration;

mod config;
mod error;
mod pdf;
mod state;
mod ui;

use config::AppConfig;
use error::ExportError;
use state::session::Session;

/// Progress bar sweep per tick while exporting
const PROGRESS_STEP: f32 = 0.04;

/// Main application state
struct ImagesToPdf {
    config: AppConfig,
    /// Selection, drag state and export phase
    session: Session,
    /// Position of the indeterminate progress bar (0.0 - 1.0)
    progress: f32,
}

/// Application messages (events)
///
/// Tile messages carry the image id, not its index, so a message built
/// before a reorder still addresses the right image.
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Select images"
    PickImages,
    /// User clicked a tile's delete button
    RemoveImage(u64),
    /// User clicked "Clear all"
    ClearAll,
    /// Pointer pressed on a tile
    DragStart(u64),
    /// Pointer entered a tile
    DragOver(u64),
    /// Pointer left a tile
    DragLeave(u64),
    /// Pointer released on a tile
    Drop(u64),
    /// Pointer released anywhere else
    DragEnd,
    /// User clicked "Convert to PDF"
    Export,
    /// Background export completed
    ExportFinished(Result<PathBuf, ExportError>),
    /// Animation tick for the progress bar
    Tick,
}

impl ImagesToPdf {
    /// Create a new instance of the application
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        log::info!("🎨 Images to PDF started");

        (
            ImagesToPdf {
                config,
                session: Session::new(),
                progress: 0.0,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImages => {
                // Show the native multi-file picker
                let mut dialog = FileDialog::new()
                    .set_title("Select images")
                    .add_filter("Images", config::IMAGE_EXTENSIONS);
                if let Some(dir) = &self.config.default_pick_dir {
                    dialog = dialog.set_directory(dir);
                }

                if let Some(paths) = dialog.pick_files() {
                    self.session.add_images(paths);
                }
                Task::none()
            }
            Message::RemoveImage(id) => {
                if let Some(index) = self.session.index_of(id) {
                    // Failure is already reported in the status line
                    let _ = self.session.remove_image(index);
                }
                Task::none()
            }
            Message::ClearAll => {
                self.session.clear();
                Task::none()
            }
            Message::DragStart(id) => {
                if let Some(index) = self.session.index_of(id) {
                    self.session.on_drag_start(index);
                }
                Task::none()
            }
            Message::DragOver(id) => {
                if let Some(index) = self.session.index_of(id) {
                    self.session.on_drag_over(index);
                }
                Task::none()
            }
            Message::DragLeave(id) => {
                if let Some(index) = self.session.index_of(id) {
                    self.session.on_drag_leave(index);
                }
                Task::none()
            }
            Message::Drop(id) => {
                match self.session.index_of(id) {
                    Some(index) => {
                        self.session.on_drop(index);
                    }
                    None => self.session.on_drag_end(),
                }
                Task::none()
            }
            Message::DragEnd => {
                self.session.on_drag_end();
                Task::none()
            }
            Message::Export => self.start_export(),
            Message::ExportFinished(result) => {
                self.session.finish_export(result);
                self.progress = 0.0;
                Task::none()
            }
            Message::Tick => {
                self.progress = (self.progress + PROGRESS_STEP) % 1.0;
                Task::none()
            }
        }
    }

    /// Ask for a destination and launch the export in the background
    fn start_export(&mut self) -> Task<Message> {
        if !self.session.can_export() {
            return Task::none();
        }

        let suggested = self
            .config
            .default_output_name(chrono::Local::now().naive_local());
        let output = FileDialog::new()
            .set_title("Save PDF")
            .set_file_name(suggested)
            .add_filter("PDF", &["pdf"])
            .save_file();

        let Some(output) = output else {
            self.session.cancel_export();
            return Task::none();
        };
        let output = config::ensure_pdf_extension(output);

        match self.session.begin_export() {
            Some(images) => Task::perform(
                pdf::export_in_background(images, output, self.config.export_options()),
                Message::ExportFinished,
            ),
            None => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = column![
            text("Images to PDF").size(32),
            text("Select images to combine into a single PDF").size(16),
            text("Drag the images to reorder them").size(14),
        ]
        .spacing(6)
        .align_x(Alignment::Center);

        let controls = row![
            button("Select images")
                .on_press(Message::PickImages)
                .padding(10),
            button("Clear all")
                .on_press(Message::ClearAll)
                .padding(10)
                .style(button::secondary),
            button("Convert to PDF")
                .on_press_maybe(self.session.can_export().then_some(Message::Export))
                .padding(10)
                .style(button::success),
        ]
        .spacing(10);

        let mut content: Column<Message> = column![
            header,
            controls,
            ui::grid::view(&self.session, self.config.thumbnail_size),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Alignment::Center);

        if self.session.export_phase().is_exporting() {
            content = content.push(progress_bar(0.0..=1.0, self.progress).width(400));
        }
        content = content.push(text(self.session.status()).size(14));

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();

        if self.session.reorder().is_dragging() {
            // Releases that no tile captured end the drag
            subscriptions.push(event::listen_with(|event, status, _window| {
                match (event, status) {
                    (
                        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)),
                        event::Status::Ignored,
                    ) => Some(Message::DragEnd),
                    _ => None,
                }
            }));
        }

        if self.session.export_phase().is_exporting() {
            subscriptions
                .push(time::every(Duration::from_millis(50)).map(|_| Message::Tick));
        }

        Subscription::batch(subscriptions)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::default();
    let window_size = (config.window_width, config.window_height);

    iced::application(
        "Images to PDF",
        ImagesToPdf::update,
        ImagesToPdf::view,
    )
    .subscription(ImagesToPdf::subscription)
    .theme(ImagesToPdf::theme)
    .window_size(window_size)
    .centered()
    .run_with(move || ImagesToPdf::new(config))
}
