use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter document into a SQL query
    Compile {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long, help = "Filter document as inline JSON", conflicts_with = "filter_file")]
        filter: Option<String>,

        #[arg(long, help = "Path to a JSON file holding the filter document")]
        filter_file: Option<String>,

        #[arg(long, default_value = "postgres", help = "SQL dialect: postgres, mysql or sqlite")]
        dialect: String,

        #[arg(long, help = "Fail on unknown operators and malformed clauses instead of skipping them")]
        strict: bool,

        #[arg(long, default_value_t = '$', help = "Prefix reserving a key for operators")]
        marker: char,

        #[arg(long, default_value = "id", help = "Primary key column of the base table")]
        base_key: String,

        #[arg(
            long,
            help = "If set, prints the compiled predicate tree and the SQL as JSON"
        )]
        json: bool,
    },
    /// Validate a relation registry and list its relations
    Relations {
        #[arg(long, help = "Path to the relation registry JSON file")]
        relations: String,
    },
}

#[derive(Args)]
pub struct TargetArgs {
    #[arg(long, help = "Base table the filter applies to")]
    pub table: String,

    #[arg(long, help = "Path to the relation registry JSON file")]
    pub relations: Option<String>,
}
