use super::*;

#[test]
fn whatsapp_link_encodes_message() {
    let link = whatsapp_link("+593987511899", "¡Hola! ¿Slot #2?");
    assert_eq!(link, "https://wa.me/+593987511899?text=%C2%A1Hola%21+%C2%BFSlot+%232%3F");
}

#[test]
fn whatsapp_link_trims_number() {
    assert!(whatsapp_link(" +593 ", "hi").starts_with("https://wa.me/+593?"));
}

#[test]
fn join_service_text() {
    let message = ContactMessage::JoinService { service: "Netflix Premium".into(), price: "$4.99".into() };
    assert_eq!(
        message.text(),
        "¡Hola! Me interesa unirme al servicio de Netflix Premium por $4.99/mes. ¿Hay espacios disponibles?"
    );
}

#[test]
fn join_plan_text() {
    let message = ContactMessage::JoinPlan { platform: "Netflix".into(), plan: "Premium".into(), price: "$3.99".into() };
    assert_eq!(
        message.text(),
        "¡Hola! Me interesa unirme al plan Premium de Netflix por $3.99/mes. ¿Hay slots disponibles?"
    );
}

#[test]
fn support_text_mentions_slot() {
    let message = ContactMessage::Support { service: "Spotify".into(), slot_number: 3 };
    assert!(message.text().contains("Spotify (Slot #3)"));
}

#[test]
fn deserializes_tagged_messages() {
    let general: ContactMessage = serde_json::from_str(r#"{"kind":"general"}"#).unwrap();
    assert_eq!(general, ContactMessage::General);

    let support: ContactMessage =
        serde_json::from_str(r#"{"kind":"support","service":"Netflix","slot_number":2}"#).unwrap();
    assert_eq!(support, ContactMessage::Support { service: "Netflix".into(), slot_number: 2 });

    assert!(serde_json::from_str::<ContactMessage>(r#"{"kind":"refund"}"#).is_err());
}

#[test]
fn link_uses_message_text() {
    let link = ContactMessage::Questions.link(DEFAULT_WHATSAPP_NUMBER);
    assert!(link.starts_with("https://wa.me/+593987511899?text=Tengo+algunas+dudas"));
}
