use sqlx::SqlitePool;

use crate::{
    error::{Error, Result},
    models::{Organization, Staff},
};

pub async fn list_organizations(pool: &SqlitePool) -> Result<Vec<Organization>> {
    let rows = sqlx::query_as::<_, Organization>(
        "SELECT id, name, location FROM organizations ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_staff(pool: &SqlitePool, organization_id: i64) -> Result<Vec<Staff>> {
    let rows = sqlx::query_as::<_, Staff>(
        "SELECT id, organization_id, name, role FROM staff WHERE organization_id = ? ORDER BY name",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn add_staff(
    pool: &SqlitePool,
    organization_id: i64,
    name: &str,
    role: &str,
) -> Result<i64> {
    let name = name.trim();
    let role = role.trim();
    if name.is_empty() || role.is_empty() {
        return Err(Error::MissingStaffFields);
    }

    let result = sqlx::query("INSERT INTO staff (organization_id, name, role) VALUES (?, ?, ?)")
        .bind(organization_id)
        .bind(name)
        .bind(role)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Hard delete. A staff member referenced by any appointment is protected by
/// the store's RESTRICT rule; that failure propagates as a database error
/// rather than being pre-checked here.
pub async fn delete_staff(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM staff WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::StaffNotFound(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::create_appointment;
    use crate::db::test_pool;
    use crate::models::BookingRequest;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn organizations_are_listed_by_name() {
        let pool = test_pool().await;

        let orgs = list_organizations(&pool).await.unwrap();
        let names: Vec<&str> = orgs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            ["City DMV - Downtown", "First National Bank", "General Hospital"]
        );
    }

    #[tokio::test]
    async fn add_staff_is_scoped_to_its_organization() {
        let pool = test_pool().await;

        let id = add_staff(&pool, 1, "  Morgan Lee  ", "Clerk").await.unwrap();

        let dmv_staff = list_staff(&pool, 1).await.unwrap();
        assert_eq!(dmv_staff.len(), 2);
        assert!(dmv_staff.iter().any(|s| s.id == id && s.name == "Morgan Lee"));

        let hospital_staff = list_staff(&pool, 2).await.unwrap();
        assert!(hospital_staff.iter().all(|s| s.id != id));
    }

    #[tokio::test]
    async fn add_staff_rejects_blank_fields() {
        let pool = test_pool().await;

        let result = add_staff(&pool, 1, " ", "Clerk").await;
        assert!(matches!(result, Err(Error::MissingStaffFields)));

        let result = add_staff(&pool, 1, "Morgan Lee", "").await;
        assert!(matches!(result, Err(Error::MissingStaffFields)));
    }

    #[tokio::test]
    async fn delete_staff_removes_unreferenced_rows() {
        let pool = test_pool().await;

        let id = add_staff(&pool, 1, "Morgan Lee", "Clerk").await.unwrap();
        delete_staff(&pool, id).await.unwrap();

        assert!(list_staff(&pool, 1).await.unwrap().iter().all(|s| s.id != id));

        let missing = delete_staff(&pool, id).await;
        assert!(matches!(missing, Err(Error::StaffNotFound(_))));
    }

    #[tokio::test]
    async fn delete_staff_with_appointments_is_restricted() {
        let pool = test_pool().await;

        create_appointment(
            &pool,
            BookingRequest {
                organization_id: 1,
                staff_id: 1,
                first_name: "Dana".into(),
                last_name: "Whitfield".into(),
                phone: "555-0101".into(),
                email: None,
                service_type: "Road Test".into(),
                start_time: Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap(),
                end_time: Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap(),
                notes: None,
            },
        )
        .await
        .unwrap();

        let result = delete_staff(&pool, 1).await;
        assert!(matches!(result, Err(Error::Database(_))));

        // Both the staff row and the appointment survive the failed delete.
        assert!(list_staff(&pool, 1).await.unwrap().iter().any(|s| s.id == 1));
        let appointments = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(appointments, 1);
    }
}
