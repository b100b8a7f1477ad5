//! Shared helpers used by every crate in the workspace: logging setup,
//! startup directory checks and the small response bodies that are not
//! tied to items.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_serializes_as_message_field() {
        let m = types::Message::new("Item deleted");
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v, serde_json::json!({"message": "Item deleted"}));
    }
}
