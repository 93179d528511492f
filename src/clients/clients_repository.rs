use std::sync::Arc;

use diesel::prelude::*;

use crate::clients::clients_model::{Client, ClientDb, ClientStatus};
use crate::clients::clients_traits::ClientRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::clients;

pub struct ClientRepository {
    pool: Arc<DbPool>,
}

impl ClientRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ClientRepository { pool }
    }
}

impl ClientRepositoryTrait for ClientRepository {
    fn get_clients(&self) -> Result<Vec<Client>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = clients::table.load::<ClientDb>(&mut conn)?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    fn get_active_clients(&self) -> Result<Vec<Client>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = clients::table
            .filter(clients::status.eq(ClientStatus::Active.as_str()))
            .load::<ClientDb>(&mut conn)?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    fn get_client(&self, client_id: &str) -> Result<Client> {
        let mut conn = get_connection(&self.pool)?;
        let row = clients::table
            .find(client_id)
            .first::<ClientDb>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Client {} not found", client_id)))?;
        Ok(row.into())
    }
}
