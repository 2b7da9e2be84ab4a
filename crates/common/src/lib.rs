pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_serializes_with_id() {
        let m = types::Message { message: "done".into(), id: Some(7) };
        let v = serde_json::to_value(&m).expect("serialize");
        assert_eq!(v["message"], "done");
        assert_eq!(v["id"], 7);
    }
}
