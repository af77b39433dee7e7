use gtk4::prelude::*;
use gtk4 as gtk;

use crate::history::Message;
use crate::session::SELF_SENDER;

pub struct ChatView {
    root: gtk::Box,
    scroller: gtk::ScrolledWindow,
    messages_box: gtk::Box,
    entry: gtk::Entry,
    send_btn: gtk::Button,
}

impl ChatView {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 6);
        scroller.set_child(Some(&messages_box));
        root.append(&scroller);

        // Input row
        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Сообщение…"));
        let send_btn = gtk::Button::with_label("Отправить");
        send_btn.add_css_class("suggested-action");
        input_row.append(&entry);
        input_row.append(&send_btn);
        root.append(&input_row);

        Self {
            root,
            scroller,
            messages_box,
            entry,
            send_btn,
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn entry_text(&self) -> String {
        self.entry.text().to_string()
    }

    pub fn clear_entry(&self) {
        self.entry.set_text("");
    }

    /// Rebuild the message pane from scratch and scroll to the bottom.
    /// Own messages sit on the right, everything else on the left.
    pub fn set_transcript(&self, messages: &[Message]) {
        while let Some(child) = self.messages_box.first_child() {
            self.messages_box.remove(&child);
        }
        for msg in messages {
            let lbl = gtk::Label::new(Some(&format!("{}: {}", msg.sender, msg.text)));
            lbl.set_wrap(true);
            if msg.sender == SELF_SENDER {
                lbl.set_halign(gtk::Align::End);
            } else {
                lbl.set_halign(gtk::Align::Start);
            }
            self.messages_box.append(&lbl);
        }
        let adj = self.scroller.vadjustment();
        adj.set_value(adj.upper());
    }

    /// Invoke `f` on a Send click or Enter in the entry.
    pub fn connect_send<F: Fn() + 'static>(&self, f: F) {
        use std::rc::Rc;
        let f: Rc<dyn Fn()> = Rc::new(f);
        {
            let f = f.clone();
            self.send_btn.connect_clicked(move |_| (f)());
        }
        {
            let f = f.clone();
            self.entry.connect_activate(move |_| (f)());
        }
    }
}
