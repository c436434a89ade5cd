use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use serde::de::DeserializeOwned;

use sift::coerce::parse_timestamp;
use sift::examples::models::{
    Contact, ContactFilters, ContactResponse, Gender, User, UserFilters, UserResponse,
};
use sift::examples::support;
use sift::{
    DomainFilters, FilterCriterion, InMemorySource, SearchRequest, Searchable, Searcher, SiftConfig, get_shape,
    registered_shapes,
};

use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableRow, cell_or_blank};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Free Text and Paging",
        commands: &[
            "sift search users --search \"ho chi minh\"                # Built-in sample users",
            "sift search contacts --data contacts.json --page 2 --page-size 10",
        ],
    },
    ExampleGroup {
        title: "Filters and Sorting",
        commands: &[
            "sift search users -f \"role:in:Admin,CSKH\" -f isEmailVerified:eq:true",
            "sift search users -f phoneNumber:isnull --sort-by fullName --sort-order asc",
            "sift search users --gender female --created-from 2024-01-05",
        ],
    },
];

#[derive(Args)]
pub struct SearchArgs {
    /// Record shape to search (see `sift schema`)
    pub shape: String,

    /// JSON file holding an array of records; relative paths resolve against
    /// the configured data directory. Built-in sample records when omitted.
    #[arg(long, short = 'd', value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Free-text term matched against the shape's text fields
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter criterion, repeatable
    #[arg(long = "filter", short = 'f', value_name = "FIELD:OP[:VALUE]")]
    pub filters: Vec<FilterCriterion>,

    /// Field to sort by (defaults to the shape's default sort)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// `asc`, anything else sorts descending
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Page number, clamped to at least 1
    #[arg(long, allow_negative_numbers = true)]
    pub page: Option<i64>,

    /// Records per page, clamped to the configured maximum
    #[arg(long, allow_negative_numbers = true)]
    pub page_size: Option<i64>,

    /// Only users of this gender
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Only users whose email is (or is not) verified
    #[arg(long)]
    pub email_verified: Option<bool>,

    /// Only records created at or after this time
    #[arg(long, value_parser = parse_time_arg)]
    pub created_from: Option<DateTime<Utc>>,

    /// Only records created at or before this time
    #[arg(long, value_parser = parse_time_arg)]
    pub created_to: Option<DateTime<Utc>>,
}

fn parse_time_arg(value: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(value).ok_or_else(|| format!("'{value}' is not a date or RFC 3339 timestamp"))
}

impl SearchArgs {
    fn request<D>(&self, domain: D) -> SearchRequest<D> {
        SearchRequest {
            search: self.search.clone(),
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            filters: self.filters.clone(),
            domain,
        }
    }
}

pub async fn handle_search(args: SearchArgs, config: &SiftConfig, output: &OutputManager) -> Result<()> {
    let Some(shape) = get_shape(&args.shape) else {
        let known: Vec<&str> = registered_shapes().iter().map(|s| s.shape).collect();
        bail!("Unknown shape '{}'. Known shapes: {}", args.shape, known.join(", "));
    };

    let searcher = Searcher::from_config(config);

    if shape.shape == User::SHAPE {
        let domain = UserFilters {
            gender: args.gender,
            is_email_verified: args.email_verified,
            created_from: args.created_from,
            created_to: args.created_to,
        };
        run_search::<User, _, UserResponse>(&args, domain, support::sample_users, &searcher, config, output).await
    } else if shape.shape == Contact::SHAPE {
        if args.gender.is_some() || args.email_verified.is_some() {
            output.warning("--gender and --email-verified apply to users only; ignoring them");
        }
        let domain = ContactFilters {
            created_from: args.created_from,
            created_to: args.created_to,
        };
        run_search::<Contact, _, ContactResponse>(
            &args,
            domain,
            || support::sample_contacts(25),
            &searcher,
            config,
            output,
        )
        .await
    } else {
        bail!("Shape '{}' has no command-line binding", shape.shape)
    }
}

async fn run_search<R, D, T>(
    args: &SearchArgs,
    domain: D,
    sample: impl FnOnce() -> Vec<R>,
    searcher: &Searcher,
    config: &SiftConfig,
    output: &OutputManager,
) -> Result<()>
where
    R: Searchable + DeserializeOwned + Clone,
    D: DomainFilters<R>,
    T: From<R> + Serialize + TableRow,
{
    let source = match &args.data {
        Some(file) => {
            let path = config.data.resolve(file)?;
            output.verbose(&format!("Loading {} from {}", R::SHAPE, path.display()));
            InMemorySource::<R>::from_json_file(&path)
                .await
                .with_context(|| format!("Failed to load records from {}", path.display()))?
        }
        None => {
            output.verbose(&format!("Using built-in sample {}", R::SHAPE));
            InMemorySource::from(sample())
        }
    };

    let request = args.request(domain);
    let result = searcher.search(&source, &request, <T as From<R>>::from).await?;

    output.heading(&format!("{} ({} of {} records)", R::SHAPE, result.items.len(), source.len()));
    output.display(&result)?;
    output.info(&format!(
        "Page {} of {}, {} per page, {} matching",
        result.page,
        result.total_pages().max(1),
        result.page_size,
        result.total_count
    ));
    Ok(())
}

impl TableRow for UserResponse {
    fn headers() -> &'static [&'static str] {
        &["Id", "Full name", "Email", "Gender", "Role", "Phone", "Verified", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name.clone(),
            self.email.clone(),
            self.gender.to_string(),
            self.role.to_string(),
            cell_or_blank(self.phone_number.as_deref()),
            self.is_email_verified.to_string(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl TableRow for ContactResponse {
    fn headers() -> &'static [&'static str] {
        &["Id", "Name", "Gmail", "Phone", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.gmail.clone(),
            self.phone_number.clone(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}
