//! Command handlers: resolve settings, call into the workflows, print results.

use crate::auth::{AuthError, AuthService};
use crate::chat;
use crate::cli::{
    CategoriesArgs, ChatArgs, Command, GenerateArgs, LoginArgs, RootArgs, SignupArgs,
    ValidateArgs,
};
use crate::config::Settings;
use crate::document::{Category, RequestForm, COMPLIANCE_CHECKLIST, JURISDICTIONS};
use crate::export::export_document;
use crate::lm::{client_from_settings, ModelClient};
use crate::lm_log::LmLog;
use crate::render;
use crate::store::FileStore;
use crate::workflow::{DocumentWorkflow, StepOutcome, ValidationWorkflow, WorkflowError};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn dispatch(args: RootArgs) -> Result<()> {
    let settings = Settings::resolve(args.global.overrides())?;
    tracing::debug!(data_dir = %settings.data_dir.display(), model = %settings.model, "settings resolved");

    match args.command {
        Command::Generate(args) => run_generate(&settings, args),
        Command::Validate(args) => run_validate(&settings, args),
        Command::Chat(args) => run_chat(&settings, args),
        Command::Categories(args) => run_categories(args),
        Command::Signup(args) => run_signup(&settings, args),
        Command::Login(args) => run_login(&settings, args),
        Command::Logout => run_logout(&settings),
        Command::Whoami => run_whoami(&settings),
    }
}

/// Model backend and optional invocation log for one command.
struct ModelContext {
    client: Box<dyn ModelClient>,
    log: Option<LmLog>,
}

impl ModelContext {
    fn new(settings: &Settings) -> Result<Self> {
        settings.warn_if_unconfigured();
        Ok(Self {
            client: client_from_settings(settings)?,
            log: settings.lm_log.as_ref().map(LmLog::new),
        })
    }

    fn client(&self) -> &dyn ModelClient {
        self.client.as_ref()
    }

    fn log(&self) -> Option<&LmLog> {
        self.log.as_ref()
    }
}

fn auth_service(settings: &Settings) -> Result<AuthService<FileStore>> {
    let auth = AuthService::new(FileStore::new(&settings.data_dir));
    auth.initialize()?;
    Ok(auth)
}

pub fn run_generate(settings: &Settings, args: GenerateArgs) -> Result<()> {
    let requests = request_forms(&args)?
        .into_iter()
        .map(|form| form.validate().map_err(WorkflowError::InvalidRequest))
        .collect::<Result<Vec<_>, _>>()?;

    let models = ModelContext::new(settings)?;
    let mut workflow = DocumentWorkflow::with_log(models.client(), models.log());
    let mut packages = Vec::with_capacity(requests.len());

    for request in requests {
        workflow.reset();
        let package = workflow.run(request)?;

        for report in package.reports() {
            tracing::debug!(
                step = %report.step,
                fallback = report.outcome == StepOutcome::Fallback,
                duration_ms = report.duration_ms,
                detail = report.detail.as_deref().unwrap_or(""),
                "step report"
            );
        }
        tracing::debug!(transitions = ?workflow.transitions(), "workflow finished");
        if package.is_degraded() {
            tracing::info!(state = %workflow.state(), "completed with fallback data");
        }
        packages.push(package);
    }
    if let Some(log) = models.log() {
        let entries = log.read_entries().map(|entries| entries.len()).unwrap_or_default();
        tracing::info!(path = %log.path().display(), entries, "model calls logged");
    }

    match packages.as_slice() {
        [package] if args.json => print_json(package)?,
        _ if args.json => print_json(&packages)?,
        _ => {
            let rendered: Vec<String> = packages.iter().map(render::render_package).collect();
            print!("{}", rendered.join("\n"));
        }
    }

    if let Some(dir) = args.export.as_deref() {
        for package in &packages {
            let path = export_document(dir, &package.document)?;
            eprintln!("Exported to {}", path.display());
        }
    }
    Ok(())
}

/// One form per `--request FILE` (or a single flags-only form), each with
/// the individual flags applied on top; flags win.
fn request_forms(args: &GenerateArgs) -> Result<Vec<RequestForm>> {
    if args.requests.is_empty() {
        return Ok(vec![apply_flags(RequestForm::default(), args)?]);
    }
    args.requests
        .iter()
        .map(|path| apply_flags(read_request_file(path)?, args))
        .collect()
}

fn apply_flags(mut form: RequestForm, args: &GenerateArgs) -> Result<RequestForm> {
    if let Some(category) = args.category {
        form.category = Some(category);
    }
    if let Some(sub_type) = &args.sub_type {
        form.sub_type = sub_type.clone();
    }
    if let Some(jurisdiction) = &args.jurisdiction {
        form.jurisdiction = jurisdiction.clone();
    }
    if let Some(full_name) = &args.full_name {
        form.full_name = full_name.clone();
    }
    if let Some(counterparty) = &args.counterparty {
        form.counterparty = Some(counterparty.clone());
    }
    if let Some(details) = &args.details {
        form.details = details.clone();
    }
    if let Some(path) = args.previous_documents.as_deref() {
        let context = fs::read_to_string(path)
            .with_context(|| format!("read previous documents {}", path.display()))?;
        form.previous_documents = Some(context);
    }
    Ok(form)
}

fn read_request_file(path: &Path) -> Result<RequestForm> {
    let bytes = fs::read(path).with_context(|| format!("read request {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse request {}", path.display()))
}

pub fn run_validate(settings: &Settings, args: ValidateArgs) -> Result<()> {
    let session = auth_service(settings)?.require_session()?;
    tracing::debug!(email = %session.user.email, "validating as signed-in user");

    let bytes =
        fs::read(&args.file).with_context(|| format!("read document {}", args.file.display()))?;
    let models = ModelContext::new(settings)?;
    let result = ValidationWorkflow::with_log(models.client(), models.log()).validate(&bytes)?;

    if args.json {
        print_json(&result)?;
    } else {
        print!("{}", render::render_validation(&result));
    }
    Ok(())
}

pub fn run_chat(settings: &Settings, args: ChatArgs) -> Result<()> {
    let models = ModelContext::new(settings)?;
    let reply = chat::ask(models.client(), models.log(), &args.message)?;
    println!("{reply}");
    Ok(())
}

#[derive(Serialize)]
struct CategoryListing {
    id: Category,
    label: &'static str,
    sub_types: &'static [&'static str],
    procedures: &'static [&'static str],
    risks: &'static [&'static str],
}

#[derive(Serialize)]
struct Catalog {
    categories: Vec<CategoryListing>,
    compliance_checklist: &'static [&'static str],
    jurisdictions: &'static [&'static str],
}

pub fn run_categories(args: CategoriesArgs) -> Result<()> {
    if !args.json {
        print!("{}", render::render_categories());
        return Ok(());
    }
    let categories = Category::ALL
        .iter()
        .map(|category| {
            let info = category.info();
            CategoryListing {
                id: *category,
                label: info.label,
                sub_types: info.sub_types,
                procedures: info.procedures,
                risks: info.risks,
            }
        })
        .collect();
    print_json(&Catalog {
        categories,
        compliance_checklist: COMPLIANCE_CHECKLIST,
        jurisdictions: JURISDICTIONS,
    })
}

pub fn run_signup(settings: &Settings, args: SignupArgs) -> Result<()> {
    let session = auth_service(settings)?.signup(&args.email, &args.password, &args.name)?;
    print!("{}", render::render_session(&session));
    Ok(())
}

pub fn run_login(settings: &Settings, args: LoginArgs) -> Result<()> {
    let session = auth_service(settings)?.login(&args.email, &args.password)?;
    print!("{}", render::render_session(&session));
    Ok(())
}

pub fn run_logout(settings: &Settings) -> Result<()> {
    let auth = auth_service(settings)?;
    if auth.is_authenticated() {
        auth.logout()?;
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

pub fn run_whoami(settings: &Settings) -> Result<()> {
    match auth_service(settings)?.current_session()? {
        Some(session) => {
            print!("{}", render::render_session(&session));
            Ok(())
        }
        None => Err(AuthError::NotAuthenticated.into()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
