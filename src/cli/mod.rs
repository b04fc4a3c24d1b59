use clap::{Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the JSON HTTP API
    Serve {
        #[arg(long, env = "PR_REVIEWER_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,

        /// Per-request timeout; the request is cancelled and rolled back when it elapses
        #[arg(long, env = "PR_REVIEWER_REQUEST_TIMEOUT_SECS", default_value = "10")]
        request_timeout_secs: u64,
    },

    /// Create a team. Members are given as `username` or `username:user_id`
    AddTeam {
        name: String,

        #[arg(short, long = "member")]
        members: Vec<String>,

        /// Add the members as inactive
        #[arg(long)]
        inactive: bool,
    },

    GetTeam {
        name: String,
    },

    SetActive {
        user_id: String,

        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },

    /// List pull requests a user reviews
    Reviews {
        user_id: String,
    },

    CreatePr {
        id: String,
        title: String,
        author_id: String,
    },

    Merge {
        id: String,
    },

    Reassign {
        pr_id: String,
        old_reviewer_id: String,
    },

    /// Open review load per member of a team
    Stats {
        team_name: String,
    },
}
