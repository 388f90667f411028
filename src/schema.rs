diesel::table! {
    budgets (id) {
        id -> Text,
        user_id -> Text,
        name -> Text,
        description -> Nullable<Text>,
        expense_allocation -> Text,
        savings_allocation -> Text,
        expense_spent -> Text,
        linked_savings_goal_id -> Nullable<Text>,
        last_reset -> Nullable<Date>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    transactions (id) {
        id -> Text,
        user_id -> Text,
        transaction_type -> Text,
        amount -> Text,
        category -> Text,
        transaction_date -> Date,
        budget_id -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    savings_goals (id) {
        id -> Text,
        user_id -> Text,
        name -> Text,
        current_amount -> Text,
        target_amount -> Text,
        status -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    goal_progress_history (id) {
        id -> Text,
        user_id -> Text,
        goal_id -> Text,
        amount -> Text,
        source -> Text,
        recorded_at -> Timestamp,
    }
}

diesel::table! {
    user_settings (user_id) {
        user_id -> Text,
        timezone -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    budgets,
    transactions,
    savings_goals,
    goal_progress_history,
    user_settings,
);
