use std::sync::Arc;

use account_authz::{AccountAuthzConfig, AccountAuthzLocalClient, Service};
use account_authz_sdk::{AccountAuthzClient, AccountSelector, CheckOptions};
use anyhow::Context;
use riskdesk_security::SecurityContext;
use serde_json::{Value, json};
use static_directory_plugin::StaticDirectoryPluginConfig;

use crate::cli::{Cli, Command};

/// Load the directory and config named on the command line, answer the
/// command and return the JSON document to print.
pub async fn run(cli: &Cli) -> anyhow::Result<Value> {
    let directory_cfg = StaticDirectoryPluginConfig::from_yaml_file(&cli.directory)?;
    let directory = Arc::new(
        static_directory_plugin::Service::from_config(&directory_cfg)
            .context("cannot build directory")?,
    );
    let config = AccountAuthzConfig::load(cli.config.as_deref())?;

    let home = directory
        .home_account(cli.user)
        .with_context(|| format!("user {} is not in the directory", cli.user))?;
    let ctx = SecurityContext::builder()
        .subject_id(cli.user)
        .subject_account_id(home)
        .build();

    let authz: Arc<dyn AccountAuthzClient> = Arc::new(AccountAuthzLocalClient::new(Arc::new(
        Service::new(directory, config),
    )));
    tracing::debug!(user = cli.user, home_account = home, "evaluating");

    answer(authz.as_ref(), &ctx, &cli.command, &cli.policy.to_options()).await
}

async fn answer(
    authz: &dyn AccountAuthzClient,
    ctx: &SecurityContext,
    command: &Command,
    options: &CheckOptions,
) -> anyhow::Result<Value> {
    let out = match command {
        Command::Scopes { permission } => {
            let scopes = authz.resolve_scopes(ctx, *permission).await?;
            json!({ "permission": permission, "scopes": scopes })
        }
        Command::Account {
            permission,
            account_id,
            exact,
        } => {
            let allowed = authz
                .has_account_permission(ctx, *permission, *account_id, !exact, options)
                .await?;
            json!({ "permission": permission, "account_id": account_id, "allowed": allowed })
        }
        Command::Subtree {
            permission,
            account_id,
        } => {
            let allowed = authz
                .has_permission_in_subtree(ctx, *permission, *account_id, options)
                .await?;
            json!({ "permission": permission, "account_id": account_id, "allowed": allowed })
        }
        Command::Location {
            permission,
            location_id,
        } => {
            let allowed = authz
                .has_location_permission(ctx, *permission, *location_id, options)
                .await?;
            json!({ "permission": permission, "location_id": location_id, "allowed": allowed })
        }
        Command::Authorize {
            permission,
            account_id,
            query,
        } => {
            let selector = match (account_id, query) {
                (Some(id), _) => AccountSelector::Explicit(*id),
                (None, Some(raw)) => AccountSelector::from_query(raw),
                (None, None) => AccountSelector::Own,
            };
            let account = authz
                .authorized_account(ctx, *permission, &selector, options)
                .await?;
            json!({
                "permission": permission,
                "allowed": account.is_some(),
                "account": account,
            })
        }
        Command::Locations {
            permission,
            account_id: Some(account_id),
        } => {
            let locations = authz
                .visible_locations(ctx, *permission, *account_id, options)
                .await?;
            json!({ "permission": permission, "account_id": account_id, "locations": locations })
        }
        Command::Locations {
            permission,
            account_id: None,
        } => {
            let ids = authz
                .authorized_location_ids(ctx, *permission, options)
                .await?;
            json!({ "permission": permission, "location_ids": ids })
        }
    };
    Ok(out)
}
