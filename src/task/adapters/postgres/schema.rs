//! Diesel schema for task persistence.

diesel::table! {
    /// Prioritized task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user identifier.
        #[max_length = 255]
        owner -> Varchar,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Whether the task sits in the primary sublist.
        is_primary -> Bool,
        /// 1-based rank within the sublist.
        priority -> Int4,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Tag set as a JSON array of strings.
        tags -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        modified_at -> Timestamptz,
        /// Completion timestamp, set only while completed.
        completed_at -> Nullable<Timestamptz>,
    }
}
