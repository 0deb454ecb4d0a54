//! End-to-end panel behavior against an in-memory backend.

use proptest::prelude::*;
use std::time::Duration;
use tokio::sync::broadcast;

use vizedit_channel::{BackendSession, ChannelError, MemoryAcceptor, memory};
use vizedit_core::{Config, Display, PanelEvent, SessionId, Transition, Visibility};
use vizedit_panel::{Host, Panel, PanelError, VisibilityControl};

struct Fixture {
    host: Host<vizedit_channel::MemoryConnector>,
    acceptor: MemoryAcceptor,
    events: broadcast::Receiver<PanelEvent>,
}

impl Fixture {
    fn new() -> Self {
        let (connector, acceptor) = memory::hub();
        let host = Host::new(connector, Config::default());
        let events = host.events();
        Self {
            host,
            acceptor,
            events,
        }
    }

    async fn open(&mut self, id: &str, text: &str) -> (Panel, BackendSession) {
        let panel = self
            .host
            .on_create(SessionId::new(id).unwrap(), text)
            .await
            .unwrap();
        let backend = self.acceptor.accept().await.unwrap();
        (panel, backend)
    }

    /// Waits until an event matching `pred` shows up.
    async fn wait_for(&mut self, pred: impl Fn(&PanelEvent) -> bool) -> PanelEvent {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let event = self.events.recv().await.unwrap();
                if pred(&event) {
                    return event;
                }
            }
        })
        .await
        .unwrap()
    }
}

#[tokio::test]
async fn create_update_hide_destroy_walkthrough() {
    let mut fx = Fixture::new();
    let (mut panel, backend) = fx.open("s1", "x = 1").await;
    assert_eq!(panel.visibility(), Visibility::Hidden);

    panel.toggle().unwrap();
    assert_eq!(panel.visibility(), Visibility::Visible);

    assert!(backend.send("y = 2"));
    fx.wait_for(|e| matches!(e, PanelEvent::ContentReplaced(_)))
        .await;
    assert_eq!(panel.text(), "y = 2");

    panel.hide().unwrap();
    assert_eq!(panel.visibility(), Visibility::Hidden);
    assert_eq!(panel.text(), "y = 2");

    let channel = panel.channel();
    panel.destroy();
    assert_eq!(
        channel.send("z = 3"),
        Err(ChannelError::Closed(SessionId::new("s1").unwrap()))
    );
    assert!(fx.host.document().lock().is_empty());
}

#[tokio::test]
async fn hidden_panel_still_takes_updates() {
    let mut fx = Fixture::new();
    let (mut panel, backend) = fx.open("s1", "old").await;
    panel.show().unwrap();
    panel.hide().unwrap();

    backend.send("new");
    fx.wait_for(|e| matches!(e, PanelEvent::ContentReplaced(_)))
        .await;
    assert_eq!(panel.text(), "new");

    panel.show().unwrap();
    assert_eq!(panel.text(), "new");
    let doc = fx.host.document().lock();
    assert_eq!(doc.get(panel.container()).unwrap().display, Display::Block);
}

#[tokio::test]
async fn inbound_messages_apply_in_order() {
    let mut fx = Fixture::new();
    let (panel, backend) = fx.open("s1", "").await;
    for i in 0..20 {
        backend.send(format!("v{i}"));
    }
    for _ in 0..20 {
        fx.wait_for(|e| matches!(e, PanelEvent::ContentReplaced(_)))
            .await;
    }
    assert_eq!(panel.text(), "v19");
}

#[tokio::test]
async fn identical_update_is_not_reported() {
    let mut fx = Fixture::new();
    let (panel, mut backend) = fx.open("s1", "x = 1").await;
    backend.send("x = 1");
    backend.send("y = 2");
    backend.hang_up();

    // Inbound messages and the hangup are handled in order on one task.
    let mut replaced = 0;
    loop {
        let event = tokio::time::timeout(Duration::from_secs(2), fx.events.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            PanelEvent::ContentReplaced(_) => replaced += 1,
            PanelEvent::Disconnected(_) => break,
            _ => {}
        }
    }
    assert_eq!(replaced, 1);
    assert_eq!(panel.text(), "y = 2");
}

#[tokio::test]
async fn toggle_twice_keeps_state_and_content() {
    let mut fx = Fixture::new();
    let (mut panel, _backend) = fx.open("s1", "x = 1").await;
    for start in [Visibility::Hidden, Visibility::Visible] {
        if start == Visibility::Visible {
            panel.show().unwrap();
        }
        panel.toggle().unwrap();
        panel.toggle().unwrap();
        assert_eq!(panel.visibility(), start);
        assert_eq!(panel.text(), "x = 1");
    }
}

#[tokio::test]
async fn backend_hangup_is_reported_to_host() {
    let mut fx = Fixture::new();
    let (panel, mut backend) = fx.open("s1", "").await;
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    panel.on_disconnect(move |id| {
        let _ = done_tx.send(id);
    });

    backend.hang_up();
    let event = fx
        .wait_for(|e| matches!(e, PanelEvent::Disconnected(_)))
        .await;
    assert_eq!(event.session().as_str(), "s1");
    assert_eq!(done_rx.await.unwrap().as_str(), "s1");
    assert!(matches!(
        panel.send("x"),
        Err(PanelError::Channel(ChannelError::Closed(_)))
    ));
}

#[tokio::test]
async fn panels_are_independent() {
    let mut fx = Fixture::new();
    let (mut a, backend_a) = fx.open("a", "A").await;
    let (b, mut backend_b) = fx.open("b", "B").await;
    assert_ne!(a.container(), b.container());

    a.show().unwrap();
    assert_eq!(b.visibility(), Visibility::Hidden);

    backend_a.send("A2");
    fx.wait_for(|e| matches!(e, PanelEvent::ContentReplaced(id) if id.as_str() == "a"))
        .await;
    assert_eq!(a.text(), "A2");
    assert_eq!(b.text(), "B");

    drop(a);
    b.send_content().unwrap();
    assert_eq!(backend_b.recv().await.unwrap(), "B");
}

#[tokio::test]
async fn visibility_control_capability() {
    fn menu_click(target: &mut dyn VisibilityControl) {
        target.toggle().unwrap();
    }

    let mut fx = Fixture::new();
    let (mut panel, _backend) = fx.open("s1", "").await;
    menu_click(&mut panel);
    assert_eq!(VisibilityControl::visibility(&panel), Visibility::Visible);
}

fn transition() -> impl Strategy<Value = Transition> {
    prop_oneof![
        Just(Transition::Show),
        Just(Transition::Hide),
        Just(Transition::Toggle),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn panel_visibility_matches_fold(seq in prop::collection::vec(transition(), 0..24)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let mut fx = Fixture::new();
            let (mut panel, _backend) = fx.open("s1", "x = 1").await;
            for t in &seq {
                match t {
                    Transition::Show => panel.show().unwrap(),
                    Transition::Hide => panel.hide().unwrap(),
                    Transition::Toggle => panel.toggle().unwrap(),
                }
            }
            let expected = Visibility::Hidden.fold(seq.iter().copied());
            assert_eq!(panel.visibility(), expected);
            assert_eq!(panel.text(), "x = 1");

            let doc = fx.host.document().lock();
            assert_eq!(doc.get(panel.container()).unwrap().display, expected.display());
        });
    }
}
