use iced::widget::{container, image as picture};
use iced::{Element, Fill, Subscription, Task, keyboard};
use image::{DynamicImage, RgbImage};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

use super::{PresentError, Persist, Presenter};
use crate::annotate::AnnotateError;

/// Shows the image in a window sized to it and blocks until any key press.
/// The image is written while the window is still open.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowPresenter;

/// Write step shared between the running window and the presenter.
struct Pending {
    persist: Option<Persist>,
    outcome: Option<Result<(), AnnotateError>>,
}

impl Pending {
    fn finish(&mut self) {
        if let Some(persist) = self.persist.take() {
            self.outcome = Some(persist());
        }
    }
}

struct Viewer {
    handle: picture::Handle,
    pending: Rc<RefCell<Pending>>,
}

#[derive(Debug, Clone)]
enum Message {
    KeyPressed,
}

impl Viewer {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::KeyPressed => {
                self.pending.borrow_mut().finish();
                iced::exit()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        container(picture::Image::<picture::Handle>::new(self.handle.clone()))
            .center(Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::listen().filter_map(|event| match event {
            keyboard::Event::KeyPressed { .. } => Some(Message::KeyPressed),
            _ => None,
        })
    }
}

impl Presenter for WindowPresenter {
    fn present(&mut self, canvas: &RgbImage, title: &str, persist: Persist) -> Result<(), AnnotateError> {
        let (width, height) = canvas.dimensions();
        let rgba = DynamicImage::ImageRgb8(canvas.clone()).to_rgba8().into_raw();
        let handle = picture::Handle::from_rgba(width, height, rgba);
        let title = title.to_string();
        let pending = Rc::new(RefCell::new(Pending {
            persist: Some(persist),
            outcome: None,
        }));
        let shared = Rc::clone(&pending);

        debug!("opening {width}x{height} window \"{title}\"");
        iced::application(
            move || Viewer {
                handle: handle.clone(),
                pending: Rc::clone(&shared),
            },
            Viewer::update,
            Viewer::view,
        )
        .title(move |_: &Viewer| title.clone())
        .subscription(Viewer::subscription)
        .window_size((width as f32, height as f32))
        .centered()
        .run()
        .map_err(|e| PresentError::Window(e.to_string()))?;

        // Closing the window without a key press still counts as seen.
        let mut pending = pending.borrow_mut();
        pending.finish();
        pending.outcome.take().unwrap_or(Ok(()))
    }
}
