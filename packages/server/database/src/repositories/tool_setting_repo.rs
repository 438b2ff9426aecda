use super::ToolSettingRepository;
use crate::models::{Machine, SettingEntry, SettingsScope, SettingsSelector, ToolSetting};
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use sqlx::PgPool;

const SELECT_SETTINGS: &str = r#"
    SELECT
        ts.id,
        ts.machine_id,
        m.name AS machine_name,
        ts.tool_name,
        ts.version,
        ts.setting_key,
        ts.setting_value
    FROM tool_settings ts
    LEFT JOIN machines m ON m.id = ts.machine_id
"#;

pub struct PgToolSettingRepository {
    pool: PgPool,
}

impl PgToolSettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToolSettingRepository for PgToolSettingRepository {
    async fn find(&self, selector: &SettingsSelector) -> StoreResult<Vec<ToolSetting>> {
        let tool = selector.tool_name.as_str();

        let settings = match &selector.scope {
            SettingsScope::Unscoped => {
                let sql = format!("{SELECT_SETTINGS} WHERE ts.tool_name = $1 ORDER BY ts.id");
                sqlx::query_as::<_, ToolSetting>(&sql)
                    .bind(tool)
                    .fetch_all(&self.pool)
                    .await?
            }
            SettingsScope::VersionScoped(version) => {
                let sql = format!(
                    "{SELECT_SETTINGS} WHERE ts.tool_name = $1 AND ts.version = $2 ORDER BY ts.id"
                );
                sqlx::query_as::<_, ToolSetting>(&sql)
                    .bind(tool)
                    .bind(version)
                    .fetch_all(&self.pool)
                    .await?
            }
            SettingsScope::MachineOnlyScoped(machine) => {
                let sql = format!(
                    "{SELECT_SETTINGS} WHERE m.name = $1 AND ts.tool_name = $2 ORDER BY ts.id"
                );
                sqlx::query_as::<_, ToolSetting>(&sql)
                    .bind(machine)
                    .bind(tool)
                    .fetch_all(&self.pool)
                    .await?
            }
            SettingsScope::MachineAndVersionScoped { machine, version } => {
                let sql = format!(
                    r#"{SELECT_SETTINGS}
                    WHERE m.name = $1 AND ts.tool_name = $2 AND ts.version = $3
                    ORDER BY ts.id"#
                );
                sqlx::query_as::<_, ToolSetting>(&sql)
                    .bind(machine)
                    .bind(tool)
                    .bind(version)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(settings)
    }

    async fn replace(
        &self,
        machine_name: &str,
        tool_name: &str,
        version: &str,
        entries: &[SettingEntry],
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent replace-writes of the same triple; released on commit/rollback.
        let lock_key = format!("tool_settings:{machine_name}:{tool_name}:{version}");
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&lock_key)
            .execute(&mut *tx)
            .await?;

        let tool_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tools WHERE name = $1)")
                .bind(tool_name)
                .fetch_one(&mut *tx)
                .await?;
        if !tool_exists {
            return Err(StoreError::not_found("tool", tool_name));
        }

        let machine_id: i64 = sqlx::query_scalar("SELECT id FROM machines WHERE name = $1")
            .bind(machine_name)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::not_found("machine", machine_name))?;

        let removed = sqlx::query(
            r#"
            DELETE FROM tool_settings
            WHERE machine_id = $1 AND tool_name = $2 AND version = $3
            "#,
        )
        .bind(machine_id)
        .bind(tool_name)
        .bind(version)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO tool_settings (machine_id, tool_name, version, setting_key, setting_value)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(machine_id)
            .bind(tool_name)
            .bind(version)
            .bind(&entry.key)
            .bind(&entry.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            machine = machine_name,
            tool = tool_name,
            version,
            removed,
            inserted = entries.len(),
            "Replaced tool settings"
        );
        Ok(())
    }

    async fn machines_for_tool(
        &self,
        tool_name: &str,
        version: Option<&str>,
    ) -> StoreResult<Vec<Machine>> {
        let machines = sqlx::query_as::<_, Machine>(
            r#"
            SELECT DISTINCT m.id, m.name
            FROM machines m
            JOIN tool_settings ts ON ts.machine_id = m.id
            WHERE ts.tool_name = $1
              AND ($2::text IS NULL OR ts.version = $2)
            ORDER BY m.id
            "#,
        )
        .bind(tool_name)
        .bind(version)
        .fetch_all(&self.pool)
        .await?;
        Ok(machines)
    }
}
