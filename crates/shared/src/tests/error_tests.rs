use super::*;

#[test]
fn error_code_serializes_snake_case() {
    let value = serde_json::to_value(ApiError::validation("bad")).expect("json");
    assert_eq!(value["code"], "validation");
    assert_eq!(value["message"], "bad");

    let missing = ApiError::not_found("Task not found");
    assert_eq!(missing.code, ErrorCode::NotFound);
    assert_eq!(
        serde_json::to_value(missing).expect("json")["code"],
        "not_found"
    );
}
