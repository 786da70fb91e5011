use chrono::NaiveDateTime;
use rusqlite::{Connection, ErrorCode, TransactionBehavior};

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::Appointment;
use crate::services::{availability, catalog};

/// Books `service_id` for `account_id` at `starting`.
///
/// The availability recheck and the insert share one IMMEDIATE transaction,
/// so no other writer can book the personnel in between. The unique
/// (personnel, start) index still backs this up across processes and
/// surfaces as [`AppError::SlotTaken`].
pub fn create_appointment(
    conn: &mut Connection,
    tenant_id: &str,
    service_id: &str,
    account_id: &str,
    starting: NaiveDateTime,
) -> AppResult<Appointment> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let service = catalog::get_tenant_service(&tx, tenant_id, service_id)?;
    let open = availability::for_service(&tx, &service, starting.date())?;
    if !open.contains(&starting) {
        tracing::info!(
            service_id = %service_id,
            starting = %starting,
            "rejected booking outside open slots"
        );
        return Err(AppError::InvalidTime);
    }

    let appointment = Appointment {
        id: queries::new_appointment_id(),
        service_id: service.id.clone(),
        personnel_id: service.personnel_id.clone(),
        account_id: account_id.to_string(),
        starting,
    };
    queries::insert_appointment(&tx, &appointment).map_err(map_conflict)?;
    tx.commit()?;

    tracing::info!(
        appointment_id = %appointment.id,
        service_id = %appointment.service_id,
        personnel_id = %appointment.personnel_id,
        starting = %appointment.starting,
        "appointment booked"
    );
    Ok(appointment)
}

fn map_conflict(err: rusqlite::Error) -> AppError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err {
        if e.code == ErrorCode::ConstraintViolation
            && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        {
            return AppError::SlotTaken;
        }
    }
    AppError::Storage(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::services::schedule;
    use chrono::NaiveTime;

    struct Fixture {
        conn: Connection,
        tenant: String,
        customer: String,
        service: String,
    }

    fn setup(duration_minutes: i64) -> Fixture {
        let conn = db::init_db(":memory:").unwrap();
        let tenant = queries::create_tenant(&conn, "Barbershop").unwrap();
        let personnel = queries::create_account(&conn, "staff@example.com").unwrap();
        let customer = queries::create_account(&conn, "customer@example.com").unwrap();
        let service =
            catalog::create_service(&conn, &tenant, &personnel, "Haircut", 25.0, duration_minutes)
                .unwrap();
        // Monday 10:00-18:00
        schedule::set_window(&conn, &personnel, 1, t("10:00"), t("18:00")).unwrap();
        Fixture {
            conn,
            tenant,
            customer,
            service,
        }
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn open_on(f: &Fixture, date: &str) -> Vec<NaiveDateTime> {
        let service = catalog::get_service(&f.conn, &f.service).unwrap();
        let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        availability::for_service(&f.conn, &service, date).unwrap()
    }

    #[test]
    fn test_book_open_slot() {
        let mut f = setup(60);
        let appointment = create_appointment(
            &mut f.conn,
            &f.tenant,
            &f.service,
            &f.customer,
            dt("2025-06-16 12:00"),
        )
        .unwrap();

        let stored = queries::get_appointment(&f.conn, &appointment.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.starting, dt("2025-06-16 12:00"));
        assert_eq!(stored.account_id, f.customer);
    }

    #[test]
    fn test_booking_removes_overlapping_starts() {
        let mut f = setup(60);
        create_appointment(&mut f.conn, &f.tenant, &f.service, &f.customer, dt("2025-06-16 12:00"))
            .unwrap();

        let open = open_on(&f, "2025-06-16");
        assert!(open.contains(&dt("2025-06-16 11:00")));
        assert!(!open.contains(&dt("2025-06-16 11:30")));
        assert!(!open.contains(&dt("2025-06-16 12:00")));
        assert!(!open.contains(&dt("2025-06-16 12:30")));
        assert!(open.contains(&dt("2025-06-16 13:00")));
    }

    #[test]
    fn test_every_open_slot_is_bookable() {
        let f = setup(90);
        let open = open_on(&f, "2025-06-16");
        assert!(!open.is_empty());

        for slot in open {
            let mut fresh = setup(90);
            create_appointment(&mut fresh.conn, &fresh.tenant, &fresh.service, &fresh.customer, slot)
                .unwrap();
        }
    }

    #[test]
    fn test_double_booking_rejected() {
        let mut f = setup(60);
        create_appointment(&mut f.conn, &f.tenant, &f.service, &f.customer, dt("2025-06-16 12:00"))
            .unwrap();
        let result = create_appointment(
            &mut f.conn,
            &f.tenant,
            &f.service,
            &f.customer,
            dt("2025-06-16 12:30"),
        );
        assert!(matches!(result, Err(AppError::InvalidTime)));
    }

    #[test]
    fn test_rejects_off_grid_and_out_of_hours() {
        let mut f = setup(60);
        for start in [
            "2025-06-16 12:15",
            "2025-06-16 09:30",
            "2025-06-16 17:30",
            "2025-06-17 12:00",
        ] {
            let result =
                create_appointment(&mut f.conn, &f.tenant, &f.service, &f.customer, dt(start));
            assert!(matches!(result, Err(AppError::InvalidTime)), "{start}");
        }
    }

    #[test]
    fn test_unknown_service() {
        let mut f = setup(60);
        let result = create_appointment(
            &mut f.conn,
            &f.tenant,
            "missing",
            &f.customer,
            dt("2025-06-16 12:00"),
        );
        assert!(matches!(result, Err(AppError::ServiceNotFound)));
    }

    #[test]
    fn test_unique_violation_maps_to_slot_taken() {
        let f = setup(30);
        let service = catalog::get_service(&f.conn, &f.service).unwrap();
        let appointment = Appointment {
            id: queries::new_appointment_id(),
            service_id: service.id.clone(),
            personnel_id: service.personnel_id.clone(),
            account_id: f.customer.clone(),
            starting: dt("2025-06-16 10:00"),
        };
        queries::insert_appointment(&f.conn, &appointment).unwrap();

        let err = queries::insert_appointment(
            &f.conn,
            &Appointment {
                id: queries::new_appointment_id(),
                ..appointment
            },
        )
        .unwrap_err();
        assert!(matches!(map_conflict(err), AppError::SlotTaken));
    }

    #[test]
    fn test_rejects_unstorable_dates() {
        let mut f = setup(60);
        let starting = NaiveDateTime::MAX;
        let result = create_appointment(&mut f.conn, &f.tenant, &f.service, &f.customer, starting);
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let starting = chrono::NaiveDate::from_ymd_opt(10000, 1, 3)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let result = create_appointment(&mut f.conn, &f.tenant, &f.service, &f.customer, starting);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_concurrent_writer_waits_instead_of_double_booking() {
        let path = std::env::temp_dir().join(format!("slotbook-{}.db", uuid::Uuid::new_v4()));
        let path_str = path.to_str().unwrap().to_string();
        let timeout = std::time::Duration::from_millis(100);

        let mut first = db::init_db_with_timeout(&path_str, timeout).unwrap();
        let tenant = queries::create_tenant(&first, "Barbershop").unwrap();
        let personnel = queries::create_account(&first, "staff@example.com").unwrap();
        let customer = queries::create_account(&first, "customer@example.com").unwrap();
        let service =
            catalog::create_service(&first, &tenant, &personnel, "Haircut", 25.0, 60).unwrap();
        schedule::set_window(&first, &personnel, 1, t("10:00"), t("18:00")).unwrap();

        let mut second = db::init_db_with_timeout(&path_str, timeout).unwrap();
        let starting = dt("2025-06-16 12:00");

        {
            let _held = first
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .unwrap();
            let result = create_appointment(&mut second, &tenant, &service, &customer, starting);
            match result {
                Err(AppError::Storage(rusqlite::Error::SqliteFailure(e, _))) => {
                    assert_eq!(e.code, ErrorCode::DatabaseBusy)
                }
                other => panic!("expected busy error, got {other:?}"),
            }
        }

        create_appointment(&mut second, &tenant, &service, &customer, starting).unwrap();
        let again = create_appointment(&mut first, &tenant, &service, &customer, starting);
        assert!(matches!(again, Err(AppError::InvalidTime)));

        let day = chrono::NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        let booked = queries::list_appointments(
            &first,
            &personnel,
            &day.and_time(NaiveTime::MIN),
            &(day.and_time(NaiveTime::MIN) + chrono::Duration::days(1)),
        )
        .unwrap();
        assert_eq!(booked.len(), 1);

        drop(first);
        drop(second);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{path_str}{suffix}"));
        }
    }
}
