//! An in-memory worker scope. Used by the `simulate` command to show what
//! the service worker would do with a payload, and by the handler tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::Value;

use super::scope::{ShownNotification, WindowClient, WorkerScope};
use crate::notify::DisplayedNotification;

#[derive(Debug)]
pub struct SimulatedClient {
    url: RefCell<String>,
    // A closed or cross-origin window rejects focus
    focus_ok: bool,
    navigate_ok: bool,
    focused: Cell<bool>,
}

impl SimulatedClient {
    /// A window that either accepts both focus and navigation or neither.
    pub fn new(url: &str, reachable: bool) -> Self {
        Self::with_flags(url, reachable, reachable)
    }

    pub fn with_flags(url: &str, focus_ok: bool, navigate_ok: bool) -> Self {
        Self {
            url: RefCell::new(url.to_string()),
            focus_ok,
            navigate_ok,
            focused: Cell::new(false),
        }
    }

    pub fn url(&self) -> String {
        self.url.borrow().clone()
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }
}

#[async_trait(?Send)]
impl WindowClient for SimulatedClient {
    async fn focus(&self) -> Result<()> {
        if !self.focus_ok {
            bail!("Window {} is not reachable", self.url.borrow());
        }
        self.focused.set(true);
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        if !self.navigate_ok {
            bail!("Window {} refused to navigate", self.url.borrow());
        }
        *self.url.borrow_mut() = url.to_string();
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SimulatedScope {
    clients: Vec<Rc<SimulatedClient>>,
    shown: RefCell<Vec<DisplayedNotification>>,
    opened: RefCell<Vec<String>>,
    refuse_notifications: bool,
    refuse_clients: bool,
    refuse_open: bool,
}

impl SimulatedScope {
    pub fn with_client(mut self, url: &str, reachable: bool) -> Self {
        self.clients.push(Rc::new(SimulatedClient::new(url, reachable)));
        self
    }

    /// Add a window that takes focus but rejects navigation, like one
    /// showing a page from another origin.
    pub fn with_pinned_client(mut self, url: &str) -> Self {
        self.clients
            .push(Rc::new(SimulatedClient::with_flags(url, true, false)));
        self
    }

    /// Make `show_notification` fail, as it does when permission was
    /// revoked after subscribing.
    pub fn refuse_notifications(mut self) -> Self {
        self.refuse_notifications = true;
        self
    }

    /// Make listing the open windows fail.
    pub fn refuse_clients(mut self) -> Self {
        self.refuse_clients = true;
        self
    }

    /// Make `open_window` fail, as it does outside of a user gesture.
    pub fn refuse_open(mut self) -> Self {
        self.refuse_open = true;
        self
    }

    pub fn clients(&self) -> &[Rc<SimulatedClient>] {
        &self.clients
    }

    pub fn shown(&self) -> Vec<DisplayedNotification> {
        self.shown.borrow().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

#[async_trait(?Send)]
impl WorkerScope for SimulatedScope {
    type Client = Rc<SimulatedClient>;

    async fn show_notification(&self, notification: &DisplayedNotification) -> Result<()> {
        if self.refuse_notifications {
            bail!("Notification permission was revoked");
        }
        self.shown.borrow_mut().push(notification.clone());
        Ok(())
    }

    async fn window_clients(&self) -> Result<Vec<Self::Client>> {
        if self.refuse_clients {
            bail!("Could not list window clients");
        }
        Ok(self.clients.clone())
    }

    async fn open_window(&self, url: &str) -> Result<()> {
        if self.refuse_open {
            bail!("Not allowed to open a window");
        }
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimulatedNotification {
    data: Value,
    closed: Cell<bool>,
}

impl SimulatedNotification {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            closed: Cell::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl ShownNotification for SimulatedNotification {
    fn close(&self) {
        self.closed.set(true);
    }

    fn data(&self) -> Value {
        self.data.clone()
    }
}
