#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Stage the picked file and run the submit-and-poll job.
    SubmitVideo { source_path: String },
    /// Relay one chat message to the backend.
    SendChat {
        message: String,
        video_path: Option<String>,
    },
    /// Cancel the in-flight processing job.
    CancelProcessing,
}
