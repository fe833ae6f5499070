use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{extract::FromRef, Router};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{
    identities::{self, domain::users::User, services::UserService},
    ledger::{
        self,
        balance::BalanceAdjuster,
        domain::{Expense, Revenue},
        services::{ExpenseService, LedgerService, RevenueService},
    },
    store::{json::JsonStore, memory::MemoryCollection, DynCollection},
};

pub struct Options {
    pub port: u16,

    /// Directory holding the collection files. `None` keeps records in
    /// memory for the lifetime of the process.
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone)]
pub struct AppState {
    user_service: UserService,
    expense_service: ExpenseService,
    revenue_service: RevenueService,
}

impl AppState {
    fn new(
        users: DynCollection<User>,
        expenses: DynCollection<Expense>,
        revenues: DynCollection<Revenue>,
    ) -> Self {
        let balance = BalanceAdjuster::new(users.clone());

        Self {
            user_service: UserService::new(users),
            expense_service: LedgerService::new(expenses, balance.clone()),
            revenue_service: LedgerService::new(revenues, balance),
        }
    }
}

pub async fn serve(opts: Options) -> anyhow::Result<()> {
    let state = match opts.data_dir {
        Some(data_dir) => {
            info!(?data_dir, "Persisting collections as JSON files.");

            let store = JsonStore::open(data_dir)?;

            AppState::new(
                Arc::new(store.collection::<User>()),
                Arc::new(store.collection::<Expense>()),
                Arc::new(store.collection::<Revenue>()),
            )
        }
        None => {
            info!("No data directory configured; records are kept in memory.");

            AppState::new(
                Arc::new(MemoryCollection::new()),
                Arc::new(MemoryCollection::new()),
                Arc::new(MemoryCollection::new()),
            )
        }
    };

    let app = Router::new()
        .merge(identities::http::routes())
        .merge(ledger::http::routes())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let address = SocketAddr::from(([0, 0, 0, 0], opts.port));
    info!(%address, "Listening for requests.");

    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.user_service.clone()
    }
}

impl FromRef<AppState> for ExpenseService {
    fn from_ref(state: &AppState) -> Self {
        state.expense_service.clone()
    }
}

impl FromRef<AppState> for RevenueService {
    fn from_ref(state: &AppState) -> Self {
        state.revenue_service.clone()
    }
}
