#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    pub text: String,
    pub photo_id: Option<String>,
}
