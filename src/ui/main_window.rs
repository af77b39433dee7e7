use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::app::Settings;
use crate::history::HistoryStore;
use crate::session::ChatSession;
use crate::ui::chat_view::ChatView;
use crate::ui::sidebar::Sidebar;

pub fn show_main_window(app: &Application, settings: Settings) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("TRIX Messenger")
        .default_width(900)
        .default_height(600)
        .build();

    let overlay = adw::ToastOverlay::new();

    let split = adw::Flap::builder()
        .reveal_flap(true)
        .locked(true)
        .modal(false)
        .build();

    let sidebar = Rc::new(Sidebar::new());
    split.set_flap(Some(&sidebar.widget()));

    let chat = Rc::new(ChatView::new());
    split.set_content(Some(&chat.widget()));

    overlay.set_child(Some(&split));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(Some("TRIX Messenger"));
    header.set_title_widget(Some(&title));
    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));
    window.present();

    let store = HistoryStore::open(settings.history_dir());
    let session = Rc::new(RefCell::new(ChatSession::new(
        store,
        settings.contacts.clone(),
    )));

    let render: Rc<dyn Fn()> = {
        let session = session.clone();
        let chat = chat.clone();
        let overlay = overlay.clone();
        Rc::new(move || match session.borrow().transcript() {
            Ok(messages) => chat.set_transcript(&messages),
            Err(err) => {
                log::warn!("failed to load transcript: {err}");
                overlay.add_toast(adw::Toast::new(&format!(
                    "Не удалось загрузить историю: {err}"
                )));
            }
        })
    };

    // Selecting a contact switches the active transcript.
    {
        let session = session.clone();
        let render = render.clone();
        let title = title.clone();
        sidebar.connect_selected(move |contact| {
            session.borrow_mut().switch(contact);
            title.set_label(&format!("Чат с {contact}"));
            render();
        });
    }
    let contacts = session.borrow().contacts().to_vec();
    sidebar.set_items(&contacts);

    // Sending appends the user's line, then the bot reply fires after the
    // delay against the contact captured at send time.
    {
        let session = session.clone();
        let chat_for_send = chat.clone();
        let render = render.clone();
        let overlay = overlay.clone();
        let reply_delay = Duration::from_millis(settings.reply_delay_ms);
        chat.connect_send(move || {
            let text = chat_for_send.entry_text();
            let outcome = session.borrow().send(&text);
            match outcome {
                Ok(None) => {}
                Ok(Some(pending)) => {
                    chat_for_send.clear_entry();
                    render();
                    let session = session.clone();
                    let render = render.clone();
                    let overlay = overlay.clone();
                    glib::timeout_add_local_once(reply_delay, move || {
                        match session.borrow().deliver_reply(&pending) {
                            Ok(()) => render(),
                            Err(err) => {
                                log::warn!("failed to append bot reply: {err}");
                                overlay.add_toast(adw::Toast::new(&format!(
                                    "Не удалось сохранить ответ: {err}"
                                )));
                            }
                        }
                    });
                }
                Err(err) => {
                    log::warn!("failed to append message: {err}");
                    overlay.add_toast(adw::Toast::new(&format!(
                        "Не удалось сохранить сообщение: {err}"
                    )));
                }
            }
        });
    }

    // Periodic full reload of the visible transcript, changed or not.
    {
        let render = render.clone();
        glib::timeout_add_local(
            Duration::from_millis(settings.refresh_interval_ms),
            move || {
                render();
                glib::ControlFlow::Continue
            },
        );
    }
}
