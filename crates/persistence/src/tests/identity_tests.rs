// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_db;
use crate::{
    IdentityError, IdentityProvider, IdentityUser, MIN_PASSWORD_LENGTH, NewIdentityUser,
    PasswordPolicyError, SqlitePersistence,
};
use corat_domain::Role;

fn create_test_account() -> NewIdentityUser {
    NewIdentityUser {
        email: String::from("juan.perez@placeholder.corat.mx"),
        password: String::from("secreto123"),
        display_name: String::from("Juan Pérez"),
    }
}

#[test]
fn test_create_user_issues_a_uid() {
    let mut db: SqlitePersistence = create_test_db();

    let user: IdentityUser = db.create_user(&create_test_account()).unwrap();

    assert!(!user.uid.is_empty());
    assert_eq!(user.email, "juan.perez@placeholder.corat.mx");
    assert_eq!(user.role_claim, None);
}

#[test]
fn test_create_user_normalizes_email() {
    let mut db: SqlitePersistence = create_test_db();

    let user: IdentityUser = db
        .create_user(&NewIdentityUser {
            email: String::from("  Juan.Perez@Placeholder.CORAT.mx "),
            password: String::from("secreto123"),
            display_name: String::from("Juan Pérez"),
        })
        .unwrap();

    assert_eq!(user.email, "juan.perez@placeholder.corat.mx");
}

#[test]
fn test_duplicate_email_is_rejected_and_original_kept() {
    let mut db: SqlitePersistence = create_test_db();

    let first: IdentityUser = db.create_user(&create_test_account()).unwrap();
    let err: IdentityError = db.create_user(&create_test_account()).unwrap_err();

    assert_eq!(
        err,
        IdentityError::EmailAlreadyExists(String::from("juan.perez@placeholder.corat.mx"))
    );
    // The original account is untouched.
    assert_eq!(db.role_claim(&first.uid).unwrap(), None);
}

#[test]
fn test_short_password_is_rejected() {
    let mut db: SqlitePersistence = create_test_db();

    let err: IdentityError = db
        .create_user(&NewIdentityUser {
            email: String::from("corto@placeholder.corat.mx"),
            password: String::from("abc"),
            display_name: String::from("Corto"),
        })
        .unwrap_err();

    assert_eq!(
        err,
        IdentityError::PasswordPolicy(PasswordPolicyError::TooShort {
            min_length: MIN_PASSWORD_LENGTH,
        })
    );
}

#[test]
fn test_role_claim_round_trips() {
    let mut db: SqlitePersistence = create_test_db();
    let user: IdentityUser = db.create_user(&create_test_account()).unwrap();

    assert_eq!(db.role_claim(&user.uid).unwrap(), None);

    db.set_role_claim(&user.uid, Role::Supervisor).unwrap();
    assert_eq!(db.role_claim(&user.uid).unwrap(), Some(Role::Supervisor));
}

#[test]
fn test_claims_on_unknown_uid_are_rejected() {
    let mut db: SqlitePersistence = create_test_db();

    assert_eq!(
        db.set_role_claim("no-such-uid", Role::Tecnico).unwrap_err(),
        IdentityError::UserNotFound(String::from("no-such-uid"))
    );
    assert_eq!(
        db.role_claim("no-such-uid").unwrap_err(),
        IdentityError::UserNotFound(String::from("no-such-uid"))
    );
}
