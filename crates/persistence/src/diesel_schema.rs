// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    faults (fault_id) {
        fault_id -> Text,
        document_json -> Text,
    }
}

diesel::table! {
    cycles (fault_id, cycle_id) {
        fault_id -> Text,
        cycle_id -> Text,
        document_json -> Text,
    }
}

diesel::table! {
    stations (station_id) {
        station_id -> Text,
        display_name -> Text,
        accumulated_hours -> Double,
    }
}

diesel::table! {
    user_profiles (uid) {
        uid -> Text,
        profile_json -> Text,
    }
}

diesel::table! {
    identity_accounts (uid) {
        uid -> Text,
        email -> Text,
        password_hash -> Text,
        display_name -> Text,
        role_claim -> Nullable<Text>,
    }
}

diesel::table! {
    audit_events (event_id) {
        event_id -> BigInt,
        actor_id -> Text,
        actor_type -> Text,
        cause_id -> Text,
        cause_description -> Text,
        action_name -> Text,
        action_details -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    faults,
    cycles,
    stations,
    user_profiles,
    identity_accounts,
    audit_events,
);
