use gtk4::prelude::*;
use gtk4 as gtk;

pub struct Sidebar {
    root: gtk::Box,
    list: gtk::ListBox,
}

impl Sidebar {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let title = gtk::Label::new(Some("Чаты"));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let list = gtk::ListBox::new();
        root.append(&list);

        Self { root, list }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    /// Invoke `f` with the contact name whenever a row is selected.
    pub fn connect_selected<F: Fn(&str) + 'static>(&self, f: F) {
        self.list.connect_row_selected(move |_, row| {
            let label = row
                .and_then(|r| r.child())
                .and_then(|c| c.downcast::<gtk::Label>().ok());
            if let Some(label) = label {
                f(label.text().as_str());
            }
        });
    }

    /// Fill the list and select the first contact, which fires the
    /// selection handler.
    pub fn set_items(&self, contacts: &[String]) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        for name in contacts {
            let row = gtk::ListBoxRow::new();
            let label = gtk::Label::new(Some(name));
            label.set_margin_top(8);
            label.set_margin_bottom(8);
            label.set_margin_start(8);
            label.set_margin_end(8);
            label.set_halign(gtk::Align::Start);
            row.set_child(Some(&label));
            self.list.append(&row);
        }
        if let Some(first) = self.list.row_at_index(0) {
            self.list.select_row(Some(&first));
        }
    }
}
