//! Postgres 楼宇存储实现

use crate::error::StorageError;
use crate::models::{BuildingRecord, NewBuilding};
use crate::traits::BuildingStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;

pub struct PgBuildingStore {
    pub pool: PgPool,
}

impl PgBuildingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(
            database_url,
            crate::connection::DEFAULT_MAX_CONNECTIONS,
        )
        .await?;
        Ok(Self { pool })
    }

    async fn find_one(
        &self,
        sql: &'static str,
        value: &str,
    ) -> Result<Option<BuildingRecord>, StorageError> {
        let row = sqlx::query(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(building_from_row).transpose()
    }
}

fn building_from_row(row: &PgRow) -> Result<BuildingRecord, StorageError> {
    Ok(BuildingRecord {
        building_id: row.try_get("building_id")?,
        name: row.try_get("name")?,
        shortname: row.try_get("shortname")?,
        description: row.try_get("description")?,
    })
}

#[async_trait::async_trait]
impl BuildingStore for PgBuildingStore {
    async fn list_buildings(&self) -> Result<Vec<BuildingRecord>, StorageError> {
        let rows = sqlx::query(
            "select building_id, name, shortname, description \
             from buildings order by building_id",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut buildings = Vec::with_capacity(rows.len());
        for row in rows {
            buildings.push(building_from_row(&row)?);
        }
        Ok(buildings)
    }

    async fn find_building_by_id(
        &self,
        building_id: i32,
    ) -> Result<Option<BuildingRecord>, StorageError> {
        let row = sqlx::query(
            "select building_id, name, shortname, description \
             from buildings where building_id = $1",
        )
        .bind(building_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(building_from_row).transpose()
    }

    async fn find_building_by_name(
        &self,
        name: &str,
    ) -> Result<Option<BuildingRecord>, StorageError> {
        self.find_one(
            "select building_id, name, shortname, description \
             from buildings where name = $1 order by building_id limit 1",
            name,
        )
        .await
    }

    async fn find_building_by_shortname(
        &self,
        shortname: &str,
    ) -> Result<Option<BuildingRecord>, StorageError> {
        self.find_one(
            "select building_id, name, shortname, description \
             from buildings where shortname = $1",
            shortname,
        )
        .await
    }

    async fn make_building(&self, building: NewBuilding) -> Result<BuildingRecord, StorageError> {
        sqlx::query("insert into buildings (name, shortname, description) values ($1, $2, $3)")
            .bind(&building.name)
            .bind(&building.shortname)
            .bind(&building.description)
            .execute(&self.pool)
            .await?;
        info!(name = %building.name, shortname = %building.shortname, "building created");
        self.find_building_by_name(&building.name)
            .await?
            .ok_or_else(|| {
                StorageError::not_found(format!("no building found with name {}", building.name))
            })
    }
}
