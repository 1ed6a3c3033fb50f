//! Postgres 房间存储实现
//!
//! 设计要点：
//! - 列表查询只联表楼宇，不加载设备
//! - 单个房间查询补全设备聚合与房间配置
//! - 创建房间时楼宇查找与插入在同一事务中

use crate::error::StorageError;
use crate::models::RoomRecord;
use crate::postgres::assembler::{fetch_rooms, load_room_details};
use crate::postgres::filter::FilterFragment;
use crate::traits::RoomStore;
use domain::RoomLocation;
use sqlx::PgPool;
use tracing::info;

pub struct PgRoomStore {
    pub pool: PgPool,
}

impl PgRoomStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(
            database_url,
            crate::connection::DEFAULT_MAX_CONNECTIONS,
        )
        .await?;
        Ok(Self { pool })
    }

    /// 取第一条匹配的房间并补全详情
    async fn find_full(&self, filter: FilterFragment) -> Result<Option<RoomRecord>, StorageError> {
        let rooms = fetch_rooms(&self.pool, &filter).await?;
        match rooms.into_iter().next() {
            Some(room) => Ok(Some(load_room_details(&self.pool, room).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl RoomStore for PgRoomStore {
    async fn list_rooms(&self) -> Result<Vec<RoomRecord>, StorageError> {
        fetch_rooms(&self.pool, &FilterFragment::all()).await
    }

    async fn find_room_by_id(&self, room_id: i32) -> Result<Option<RoomRecord>, StorageError> {
        self.find_full(FilterFragment::new("where rooms.room_id = $1").int(room_id))
            .await
    }

    async fn find_room_by_name(&self, name: &str) -> Result<Option<RoomRecord>, StorageError> {
        self.find_full(FilterFragment::new("where rooms.name = $1").text(name))
            .await
    }

    async fn list_rooms_by_building(
        &self,
        building_shortname: &str,
    ) -> Result<Vec<RoomRecord>, StorageError> {
        let filter = FilterFragment::new("where buildings.shortname = $1").text(building_shortname);
        fetch_rooms(&self.pool, &filter).await
    }

    async fn find_room_by_location(
        &self,
        location: &RoomLocation,
    ) -> Result<Option<RoomRecord>, StorageError> {
        info!(building = %location.building, room = %location.room, "getting room info");
        self.find_full(
            FilterFragment::new("where buildings.shortname = $1 and rooms.name = $2")
                .text(location.building.as_str())
                .text(location.room.as_str()),
        )
        .await
    }

    async fn make_room(
        &self,
        name: &str,
        building_shortname: &str,
        vlan: i32,
    ) -> Result<RoomRecord, StorageError> {
        let mut tx = self.pool.begin().await?;

        let building_id: Option<i32> =
            sqlx::query_scalar("select building_id from buildings where shortname = $1")
                .bind(building_shortname)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(building_id) = building_id else {
            return Err(StorageError::not_found(format!(
                "could not find a building with the \"{building_shortname}\" shortname"
            )));
        };

        sqlx::query("insert into rooms (name, building_id, vlan) values ($1, $2, $3)")
            .bind(name)
            .bind(building_id)
            .bind(vlan)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(building = building_shortname, room = name, vlan, "room created");

        let location = RoomLocation::new(building_shortname, name);
        self.find_room_by_location(&location)
            .await?
            .ok_or_else(|| StorageError::not_found(format!("no room found for {building_shortname}-{name}")))
    }
}
