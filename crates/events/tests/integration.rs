//! Integration tests for events

#[cfg(test)]
mod tests {
    use anvil_events::{channel, AppEvent, BuildEvent, EventEmitter, GeneralEvent};

    #[tokio::test]
    async fn test_channel_delivers_in_order() {
        let (tx, mut rx) = channel();

        tx.emit(AppEvent::Build(BuildEvent::CompileStarted {
            object: "main.o".to_string(),
        }));
        tx.emit_warning("something looks off");

        match rx.recv().await {
            Some(AppEvent::Build(BuildEvent::CompileStarted { object })) => {
                assert_eq!(object, "main.o");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await {
            Some(AppEvent::General(GeneralEvent::Warning { message, context })) => {
                assert_eq!(message, "something looks off");
                assert!(context.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_emit_after_receiver_dropped_is_silent() {
        let (tx, rx) = channel();
        drop(rx);
        // Must not panic or error
        tx.emit_error("receiver already gone");
    }

    #[test]
    fn test_none_sender_is_noop() {
        let sender: Option<anvil_events::EventSender> = None;
        sender.emit_debug("goes nowhere");
    }
}
