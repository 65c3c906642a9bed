//! User-facing failure notifications, the "toast" surface of the storefront.

use tokio::sync::broadcast;

/// Cart operation a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    /// Generic message shown when the operation fails for any reason other
    /// than a stock violation.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Add => "Error adding product",
            Operation::Remove => "Error removing product",
            Operation::UpdateAmount => "Error updating product quantity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub operation: Operation,
    pub message: String,
}

impl Notification {
    pub const OUT_OF_STOCK: &'static str = "Requested quantity is out of stock";
}

/// Fan-out of notifications to every subscribed UI component.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Publishes a notification. Nobody listening is not an error.
    pub fn notify(&self, notification: Notification) {
        let _ = self.sender.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_notifications() {
        let notifier = Notifier::new(8);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.notify(Notification {
            operation: Operation::Remove,
            message: Operation::Remove.failure_message().to_string(),
        });

        assert_eq!(first.recv().await.unwrap().message, "Error removing product");
        assert_eq!(second.recv().await.unwrap().operation, Operation::Remove);
    }

    #[test]
    fn test_notify_without_subscribers_is_silent() {
        let notifier = Notifier::new(8);
        notifier.notify(Notification {
            operation: Operation::Add,
            message: Notification::OUT_OF_STOCK.to_string(),
        });
    }
}
