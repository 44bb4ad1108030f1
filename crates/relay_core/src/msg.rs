#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a local file to upload (path as typed).
    UploadRequested(String),
    /// Engine staged the file and reports the staged path.
    StagingDone { video_path: String },
    /// Staging or client-side validation rejected the file.
    StagingFailed { reason: String },
    /// Backend accepted the submission and assigned a task.
    SubmissionAccepted { task_id: String },
    /// Submission was rejected or the transport failed.
    SubmissionFailed { reason: String },
    /// One poll observed a non-terminal status.
    ProcessingProgress { status_label: String, attempt: u32 },
    /// Poll loop saw `completed`.
    ProcessingCompleted,
    /// Poll loop saw `failed`.
    ProcessingFailed,
    /// Poll loop aborted on a status-check error.
    PollAborted { reason: String },
    /// Poll loop exhausted its attempt ceiling.
    PollTimedOut { attempts: u32 },
    /// Poll loop stopped because the user cancelled it.
    PollCancelled,
    /// User typed a chat line.
    ChatSubmitted(String),
    /// Backend replied to the last chat message.
    ChatReply { text: String },
    /// Chat request failed; the session continues.
    ChatFailed { reason: String },
    /// User asked to cancel the in-flight processing job.
    CancelRequested,
    /// Carries no state change; the app sends it to wake its message loop
    /// (e.g. so a shutdown flag gets noticed).
    NoOp,
}
