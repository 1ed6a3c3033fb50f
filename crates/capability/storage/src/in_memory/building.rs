//! 内存楼宇存储

use crate::error::StorageError;
use crate::in_memory::tables::{InMemoryConfigDb, next_id};
use crate::models::{BuildingRecord, NewBuilding};
use crate::traits::BuildingStore;

#[async_trait::async_trait]
impl BuildingStore for InMemoryConfigDb {
    async fn list_buildings(&self) -> Result<Vec<BuildingRecord>, StorageError> {
        let tables = self.read()?;
        Ok(tables.buildings.clone())
    }

    async fn find_building_by_id(
        &self,
        building_id: i32,
    ) -> Result<Option<BuildingRecord>, StorageError> {
        let tables = self.read()?;
        Ok(tables.building(building_id).cloned())
    }

    async fn find_building_by_name(
        &self,
        name: &str,
    ) -> Result<Option<BuildingRecord>, StorageError> {
        let tables = self.read()?;
        Ok(tables
            .buildings
            .iter()
            .find(|building| building.name == name)
            .cloned())
    }

    async fn find_building_by_shortname(
        &self,
        shortname: &str,
    ) -> Result<Option<BuildingRecord>, StorageError> {
        let tables = self.read()?;
        Ok(tables
            .buildings
            .iter()
            .find(|building| building.shortname == shortname)
            .cloned())
    }

    async fn make_building(&self, building: NewBuilding) -> Result<BuildingRecord, StorageError> {
        let mut tables = self.write()?;
        // 对应 buildings.shortname 唯一约束
        if tables
            .buildings
            .iter()
            .any(|existing| existing.shortname == building.shortname)
        {
            return Err(StorageError::integrity(format!(
                "building shortname {} already exists",
                building.shortname
            )));
        }
        let record = BuildingRecord {
            building_id: next_id(&tables.buildings, |row| row.building_id),
            name: building.name,
            shortname: building.shortname,
            description: building.description,
        };
        tables.buildings.push(record.clone());
        Ok(record)
    }
}
