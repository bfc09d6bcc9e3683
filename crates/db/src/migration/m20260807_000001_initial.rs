//! Initial database migration.
//!
//! Creates the enums, tables, and indexes for the allocation ledger and
//! the cash register session ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: CUSTOMER BILLING
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(CREDIT_NOTES_SQL).await?;
        db.execute_unprepared(PAYMENT_ALLOCATIONS_SQL).await?;
        db.execute_unprepared(CREDIT_NOTE_ALLOCATIONS_SQL).await?;

        // ============================================================
        // PART 4: SUPPLIER PURCHASING
        // ============================================================
        db.execute_unprepared(SUPPLIER_INVOICES_SQL).await?;
        db.execute_unprepared(SUPPLIER_INVOICE_LINES_SQL).await?;
        db.execute_unprepared(SUPPLIER_PAYMENTS_SQL).await?;
        db.execute_unprepared(SUPPLIER_PAYMENT_ALLOCATIONS_SQL).await?;

        // ============================================================
        // PART 5: INVENTORY
        // ============================================================
        db.execute_unprepared(INVENTORY_SQL).await?;
        db.execute_unprepared(INVENTORY_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 6: CASH REGISTERS
        // ============================================================
        db.execute_unprepared(CASH_REGISTERS_SQL).await?;
        db.execute_unprepared(CASH_REGISTER_SESSIONS_SQL).await?;
        db.execute_unprepared(CASH_MOVEMENTS_SQL).await?;
        db.execute_unprepared(REFUNDS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles
CREATE TYPE user_role AS ENUM (
    'SUPER_ADMIN',
    'ADMIN',
    'MANAGER',
    'ACCOUNTANT',
    'CASHIER'
);

-- Invoice settlement status (customer and supplier)
CREATE TYPE invoice_status AS ENUM (
    'DRAFT',
    'UNPAID',
    'PARTIALLY_PAID',
    'PAID',
    'VOID'
);

-- Payment allocation status
CREATE TYPE payment_status AS ENUM (
    'AVAILABLE',
    'PARTIALLY_ALLOCATED',
    'FULLY_ALLOCATED'
);

-- Credit note usage status
CREATE TYPE credit_note_status AS ENUM (
    'AVAILABLE',
    'PARTIALLY_USED',
    'FULLY_USED'
);

-- Payment method
CREATE TYPE payment_method AS ENUM (
    'CASH',
    'CARD',
    'TRANSFER',
    'CHEQUE'
);

-- Cash register type
CREATE TYPE cash_register_type AS ENUM ('SALES', 'EXPENSE');

-- Cash register session status
CREATE TYPE cash_session_status AS ENUM ('OPEN', 'CLOSED');

-- Cash movement type
CREATE TYPE cash_movement_type AS ENUM (
    'PAY_IN',
    'PAY_OUT',
    'WITHDRAWAL',
    'TRANSFER_IN',
    'TRANSFER_OUT'
);

-- Inventory movement type
CREATE TYPE inventory_movement_type AS ENUM (
    'PURCHASE',
    'SALE',
    'ADJUSTMENT'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'CASHIER',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_number VARCHAR(64) NOT NULL UNIQUE,
    total NUMERIC(12, 2) NOT NULL CHECK (total >= 0),
    status invoice_status NOT NULL DEFAULT 'UNPAID',
    due_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_invoices_status ON invoices(status);
CREATE INDEX idx_invoices_due_date ON invoices(due_date);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    amount NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
    status payment_status NOT NULL DEFAULT 'AVAILABLE',
    method payment_method NOT NULL,
    payment_date DATE NOT NULL,
    cash_register_session_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payments_status ON payments(status);
CREATE INDEX idx_payments_session ON payments(cash_register_session_id)
    WHERE cash_register_session_id IS NOT NULL;
";

const CREDIT_NOTES_SQL: &str = r"
CREATE TABLE credit_notes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    initial_amount NUMERIC(12, 2) NOT NULL CHECK (initial_amount > 0),
    remaining_amount NUMERIC(12, 2) NOT NULL,
    status credit_note_status NOT NULL DEFAULT 'AVAILABLE',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CHECK (remaining_amount >= 0 AND remaining_amount <= initial_amount)
);
";

const PAYMENT_ALLOCATIONS_SQL: &str = r"
CREATE TABLE payment_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    payment_id UUID NOT NULL REFERENCES payments(id),
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    amount_allocated NUMERIC(12, 2) NOT NULL CHECK (amount_allocated > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payment_allocations_payment ON payment_allocations(payment_id);
CREATE INDEX idx_payment_allocations_invoice ON payment_allocations(invoice_id);
";

const CREDIT_NOTE_ALLOCATIONS_SQL: &str = r"
CREATE TABLE credit_note_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    credit_note_id UUID NOT NULL REFERENCES credit_notes(id),
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    amount_allocated NUMERIC(12, 2) NOT NULL CHECK (amount_allocated > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_credit_note_allocations_note ON credit_note_allocations(credit_note_id);
CREATE INDEX idx_credit_note_allocations_invoice ON credit_note_allocations(invoice_id);
";

const SUPPLIER_INVOICES_SQL: &str = r"
CREATE TABLE supplier_invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_number VARCHAR(64),
    total NUMERIC(12, 2) NOT NULL CHECK (total >= 0),
    status invoice_status NOT NULL DEFAULT 'UNPAID',
    due_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_supplier_invoices_status ON supplier_invoices(status);
";

const SUPPLIER_INVOICE_LINES_SQL: &str = r"
CREATE TABLE supplier_invoice_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES supplier_invoices(id) ON DELETE CASCADE,
    product_variant_id UUID NOT NULL,
    quantity NUMERIC(12, 3) NOT NULL CHECK (quantity > 0),
    unit_price NUMERIC(12, 2) NOT NULL CHECK (unit_price >= 0),
    received_quantity NUMERIC(12, 3) NOT NULL DEFAULT 0 CHECK (received_quantity >= 0)
);

CREATE INDEX idx_supplier_invoice_lines_invoice ON supplier_invoice_lines(invoice_id);
";

const SUPPLIER_PAYMENTS_SQL: &str = r"
CREATE TABLE supplier_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    amount NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
    status payment_status NOT NULL DEFAULT 'AVAILABLE',
    method payment_method NOT NULL,
    payment_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SUPPLIER_PAYMENT_ALLOCATIONS_SQL: &str = r"
CREATE TABLE supplier_payment_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    payment_id UUID NOT NULL REFERENCES supplier_payments(id),
    invoice_id UUID NOT NULL REFERENCES supplier_invoices(id),
    amount_allocated NUMERIC(12, 2) NOT NULL CHECK (amount_allocated > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_supplier_payment_allocations_payment
    ON supplier_payment_allocations(payment_id);
CREATE INDEX idx_supplier_payment_allocations_invoice
    ON supplier_payment_allocations(invoice_id);
";

const INVENTORY_SQL: &str = r"
CREATE TABLE inventory (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_variant_id UUID NOT NULL,
    quantity NUMERIC(12, 3) NOT NULL DEFAULT 0,
    location VARCHAR(128) NOT NULL DEFAULT 'Default'
);

CREATE INDEX idx_inventory_variant ON inventory(product_variant_id);
";

const INVENTORY_MOVEMENTS_SQL: &str = r"
CREATE TABLE inventory_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    inventory_id UUID NOT NULL REFERENCES inventory(id),
    quantity NUMERIC(12, 3) NOT NULL,
    movement_type inventory_movement_type NOT NULL,
    reason VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_inventory_movements_inventory ON inventory_movements(inventory_id);
";

const CASH_REGISTERS_SQL: &str = r"
CREATE TABLE cash_registers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(128) NOT NULL,
    register_type cash_register_type NOT NULL DEFAULT 'SALES'
);
";

const CASH_REGISTER_SESSIONS_SQL: &str = r"
CREATE TABLE cash_register_sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    cash_register_id UUID NOT NULL REFERENCES cash_registers(id),
    status cash_session_status NOT NULL DEFAULT 'OPEN',
    opening_balance NUMERIC(12, 2) NOT NULL CHECK (opening_balance >= 0),
    closing_balance NUMERIC(12, 2),
    expected_balance NUMERIC(12, 2),
    difference NUMERIC(12, 2),
    opened_by_user_id UUID NOT NULL REFERENCES users(id),
    closed_by_user_id UUID REFERENCES users(id),
    opened_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    closed_at TIMESTAMPTZ
);

CREATE INDEX idx_cash_sessions_register ON cash_register_sessions(cash_register_id);

-- At most one OPEN session per register
CREATE UNIQUE INDEX uq_cash_sessions_open_per_register
    ON cash_register_sessions(cash_register_id)
    WHERE status = 'OPEN';
";

const CASH_MOVEMENTS_SQL: &str = r"
CREATE TABLE cash_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_id UUID NOT NULL REFERENCES cash_register_sessions(id),
    user_id UUID NOT NULL REFERENCES users(id),
    amount NUMERIC(12, 2) NOT NULL,
    movement_type cash_movement_type NOT NULL,
    reason VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_cash_movements_session ON cash_movements(session_id);
";

const REFUNDS_SQL: &str = r"
CREATE TABLE refunds (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    amount NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
    method payment_method NOT NULL,
    cash_register_session_id UUID REFERENCES cash_register_sessions(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_refunds_session ON refunds(cash_register_session_id)
    WHERE cash_register_session_id IS NOT NULL;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS refunds CASCADE;
DROP TABLE IF EXISTS cash_movements CASCADE;
DROP TABLE IF EXISTS cash_register_sessions CASCADE;
DROP TABLE IF EXISTS cash_registers CASCADE;
DROP TABLE IF EXISTS inventory_movements CASCADE;
DROP TABLE IF EXISTS inventory CASCADE;
DROP TABLE IF EXISTS supplier_payment_allocations CASCADE;
DROP TABLE IF EXISTS supplier_payments CASCADE;
DROP TABLE IF EXISTS supplier_invoice_lines CASCADE;
DROP TABLE IF EXISTS supplier_invoices CASCADE;
DROP TABLE IF EXISTS credit_note_allocations CASCADE;
DROP TABLE IF EXISTS payment_allocations CASCADE;
DROP TABLE IF EXISTS credit_notes CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS inventory_movement_type;
DROP TYPE IF EXISTS cash_movement_type;
DROP TYPE IF EXISTS cash_session_status;
DROP TYPE IF EXISTS cash_register_type;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS credit_note_status;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS user_role;
";
