//! Synthesize deployment templates and resolve packaged handler assets.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use lz_stacks::assets::{handler_asset_key, AssetUploader};
use lz_stacks::custom_resource::{
    macie_member_stack, policy_attachment_stack, AssetLocation, MacieMemberSpec,
    PolicyAttachmentSpec,
};
use lz_stacks::error::SynthError;
use lz_stacks::pipeline::{functional_test_pipeline_stack, PipelineSpec};
use lz_stacks::template::Template;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "synth",
    about = "Synthesize landing-zone deployment templates and handler assets"
)]
struct Cli {
    /// Directory templates are written to
    #[arg(long, default_value = "templates")]
    out_dir: PathBuf,
    /// Directory holding packaged handler zips
    #[arg(long, default_value = "dist")]
    asset_dir: PathBuf,
    /// Bucket handler assets are addressed from
    #[arg(long, env = "LZ_ASSET_BUCKET")]
    asset_bucket: String,
    /// Upload packaged assets to the asset bucket
    #[arg(long)]
    upload: bool,
    /// Policy to keep attached
    #[arg(long, env = "LZ_POLICY_ID")]
    policy_id: String,
    /// Root, OU, or account the policy targets
    #[arg(long, env = "LZ_TARGET_ID")]
    target_id: String,
    /// Attachment listing filter
    #[arg(long, env = "LZ_POLICY_TYPE", default_value = "SERVICE_CONTROL_POLICY")]
    policy_type: String,
    /// Account to enroll as a Macie member
    #[arg(long, env = "LZ_MEMBER_ACCOUNT_ID")]
    member_account_id: String,
    /// Contact email for the member account
    #[arg(long, env = "LZ_MEMBER_EMAIL")]
    member_email: String,
    /// Functional test repository name
    #[arg(long, default_value = "landing-zone-functional-tests")]
    repository_name: String,
    /// Functional test branch
    #[arg(long, default_value = "main")]
    branch: String,
}

async fn resolve_asset(
    cli: &Cli,
    uploader: Option<&AssetUploader>,
    handler_name: &str,
) -> Result<AssetLocation, SynthError> {
    let zip_path = cli.asset_dir.join(format!("{handler_name}.zip"));
    let zip_bytes = fs::read(&zip_path)?;

    let key = match uploader {
        Some(uploader) => uploader.upload(handler_name, zip_bytes).await?,
        None => handler_asset_key(handler_name, &zip_bytes),
    };
    info!(handler = handler_name, key = %key, "handler asset resolved");

    Ok(AssetLocation {
        bucket: cli.asset_bucket.clone(),
        key,
    })
}

fn write_template(out_dir: &Path, name: &str, template: &Template) -> Result<(), SynthError> {
    let path = out_dir.join(format!("{name}.json"));
    fs::write(&path, serde_json::to_string_pretty(template)?)?;
    info!(template = name, path = %path.display(), "template written");
    Ok(())
}

async fn run(cli: Cli) -> Result<(), SynthError> {
    fs::create_dir_all(&cli.out_dir)?;

    let uploader = if cli.upload {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Some(AssetUploader::new(
            aws_sdk_s3::Client::new(&config),
            cli.asset_bucket.clone(),
        ))
    } else {
        None
    };

    let attachment_asset = resolve_asset(&cli, uploader.as_ref(), "policy_attachment").await?;
    let member_asset = resolve_asset(&cli, uploader.as_ref(), "macie_member").await?;

    write_template(
        &cli.out_dir,
        "policy_attachment",
        &policy_attachment_stack(
            &attachment_asset,
            &PolicyAttachmentSpec {
                policy_id: cli.policy_id.clone(),
                target_id: cli.target_id.clone(),
                policy_type: cli.policy_type.clone(),
            },
        ),
    )?;

    write_template(
        &cli.out_dir,
        "macie_member",
        &macie_member_stack(
            &member_asset,
            &MacieMemberSpec {
                account_id: cli.member_account_id.clone(),
                email: cli.member_email.clone(),
            },
        ),
    )?;

    write_template(
        &cli.out_dir,
        "functional_test_pipeline",
        &functional_test_pipeline_stack(&PipelineSpec {
            repository_name: cli.repository_name.clone(),
            branch: cli.branch.clone(),
        }),
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), SynthError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    run(Cli::parse()).await
}
