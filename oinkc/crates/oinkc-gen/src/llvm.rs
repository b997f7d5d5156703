//! Textual LLVM-IR emission.

use indexmap::IndexMap;
use oinkc_par::ast::{
    Assignment, CodeBlock, Declaration, Expr, ExprKind, IfStmt, Program, Return, Stmt, WhileStmt,
};
use oinkc_par::types::{DataType, TRUE_LITERAL};
use oinkc_sem::TypeMap;
use rustc_hash::FxHashMap;

/// Module-level preamble: `printf`, the exit-message format string, and
/// the `@printResult` helper `@main` calls before returning.
const PRELUDE: &str = r#"declare i32 @printf(i8*, ...)

@exit_format = private unnamed_addr constant [29 x i8] c"Program exit with result %d\0A\00", align 1

define void @printResult(i32 %val) {
  %fmt_ptr = getelementptr inbounds [29 x i8], [29 x i8]* @exit_format, i32 0, i32 0
  call i32 (i8*, ...) @printf(i8* %fmt_ptr, i32 %val)
  ret void
}
"#;

/// SSA renaming environment: variable name to its current register.
type Env = IndexMap<String, String>;

/// One incoming edge of a branch merge: predecessor label and the
/// environment the branch ended with.
type IncomingEdge = (String, Env);

/// Code generator for a single analyzed program.
pub struct CodeGenerator {
    /// Expression types recorded by the semantic analyzer.
    types: TypeMap,

    /// Per-name monotonic SSA version mint. Version 0 is `%name`,
    /// version N is `%name.N`. Never decremented, even when control flow
    /// rolls the environment back.
    versions: FxHashMap<String, u32>,

    /// Current register of every live variable.
    env: Env,

    /// Declared type of every variable seen so far.
    variable_types: FxHashMap<String, DataType>,

    /// Body lines of `@main`, appended in emission order.
    lines: Vec<String>,

    temp_counter: u32,
    label_counter: u32,

    /// Label of the basic block currently being filled; phi operands
    /// name it as their predecessor.
    current_label: String,
}

impl CodeGenerator {
    pub fn new(types: TypeMap) -> Self {
        Self {
            types,
            versions: FxHashMap::default(),
            env: Env::new(),
            variable_types: FxHashMap::default(),
            lines: Vec::new(),
            temp_counter: 0,
            label_counter: 0,
            current_label: String::from("entry"),
        }
    }

    /// Emits the complete textual module.
    pub fn generate(mut self, program: &Program) -> String {
        self.emit_label("entry");

        for statement in &program.statements {
            self.emit_stmt(statement);
        }
        self.emit_return(&program.return_stmt);

        let mut module = String::with_capacity(PRELUDE.len() + 64 + self.lines.len() * 32);
        module.push_str(PRELUDE);
        module.push('\n');
        module.push_str("define i32 @main() {\n");
        for line in &self.lines {
            module.push_str(line);
            module.push('\n');
        }
        module.push_str("}\n");
        module
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn emit_stmt(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Decl(decl) => self.emit_declaration(decl),
            Stmt::Assign(assign) => self.emit_assignment(assign),
            Stmt::If(if_stmt) => self.emit_if(if_stmt),
            Stmt::While(while_stmt) => self.emit_while(while_stmt),
        }
    }

    /// A declaration or assignment materializes its value into the
    /// variable's next register with `add <ty> 0, <value>`.
    fn emit_declaration(&mut self, decl: &Declaration) {
        let value = self.emit_expr(&decl.init);
        let init_ty = self.expr_type(&decl.init);

        let register = self.mint_register(&decl.name);
        self.variable_types.insert(decl.name.clone(), decl.ty);

        let value = self.promote(value, init_ty, decl.ty);
        self.push(format!(
            "  {} = add {} 0, {}",
            register,
            decl.ty.llvm_type(),
            value
        ));
        self.env.insert(decl.name.clone(), register);
    }

    fn emit_assignment(&mut self, assign: &Assignment) {
        let target_ty = self.variable_type(&assign.name);
        let value = self.emit_expr(&assign.value);
        let value_ty = self.expr_type(&assign.value);

        let register = self.mint_register(&assign.name);
        let value = self.promote(value, value_ty, target_ty);
        self.push(format!(
            "  {} = add {} 0, {}",
            register,
            target_ty.llvm_type(),
            value
        ));
        self.env.insert(assign.name.clone(), register);
    }

    fn emit_block(&mut self, block: &CodeBlock) {
        for statement in &block.statements {
            self.emit_stmt(statement);
        }
        if let Some(return_stmt) = &block.return_stmt {
            self.emit_return(return_stmt);
        }
    }

    /// Casts the return value to `i32`, prints it, and returns it.
    fn emit_return(&mut self, return_stmt: &Return) {
        let value = self.emit_expr(&return_stmt.expr);
        let ty = self.expr_type(&return_stmt.expr);

        let value = match ty {
            DataType::Bool => {
                let temp = self.next_temp();
                self.push(format!("  {} = zext i1 {} to i32", temp, value));
                temp
            },
            DataType::I16 => {
                let temp = self.next_temp();
                self.push(format!("  {} = sext i16 {} to i32", temp, value));
                temp
            },
            DataType::I64 => {
                let temp = self.next_temp();
                self.push(format!("  {} = trunc i64 {} to i32", temp, value));
                temp
            },
            DataType::I32 => value,
        };

        self.push(format!("  call void @printResult(i32 {})", value));
        self.push(format!("  ret i32 {}", value));
    }

    // ------------------------------------------------------------------
    // Control flow
    // ------------------------------------------------------------------

    fn emit_if(&mut self, if_stmt: &IfStmt) {
        let label_id = self.next_label_id();
        let then_label = format!("then_{}", label_id);
        let elif_labels: Vec<String> = (0..if_stmt.elif_blocks.len())
            .map(|i| format!("elif_{}_{}", label_id, i))
            .collect();
        let end_label = format!("end_{}", label_id);
        let else_label = if if_stmt.else_block.is_some() {
            format!("else_{}", label_id)
        } else {
            end_label.clone()
        };

        let outer_env = self.env.clone();

        let condition = self.emit_expr(&if_stmt.condition);
        let next = elif_labels.first().unwrap_or(&else_label).clone();
        self.push(format!(
            "  br i1 {}, label %{}, label %{}",
            condition, then_label, next
        ));

        // Block holding the most recent condition branch; it is the
        // fall-through predecessor of end_N when there is no else.
        let mut fall_through_label = self.current_label.clone();

        let mut incoming: Vec<IncomingEdge> = Vec::new();

        if let Some(edge) = self.emit_arm(&if_stmt.then_block, &then_label, &end_label, &outer_env)
        {
            incoming.push(edge);
        }

        for (i, elif_block) in if_stmt.elif_blocks.iter().enumerate() {
            self.emit_label(&elif_labels[i]);
            self.env = outer_env.clone();
            let condition = self.emit_expr(&elif_block.condition);
            let body_label = format!("{}_body", elif_labels[i]);
            let next = elif_labels
                .get(i + 1)
                .cloned()
                .unwrap_or_else(|| else_label.clone());
            self.push(format!(
                "  br i1 {}, label %{}, label %{}",
                condition, body_label, next
            ));
            fall_through_label = self.current_label.clone();

            if let Some(edge) = self.emit_arm(&elif_block.block, &body_label, &end_label, &outer_env)
            {
                incoming.push(edge);
            }
        }

        if let Some(else_block) = &if_stmt.else_block {
            if let Some(edge) = self.emit_arm(else_block, &else_label, &end_label, &outer_env) {
                incoming.push(edge);
            }
        } else {
            incoming.push((fall_through_label, outer_env.clone()));
        }

        self.emit_label(&end_label);
        self.env = outer_env.clone();
        self.emit_merge_phis(&outer_env, &incoming);
    }

    /// Emits one branch arm under its label.
    ///
    /// Returns the arm's exit edge, or `None` when the arm leaves through
    /// its own `ret` and never reaches the merge block.
    fn emit_arm(
        &mut self,
        block: &CodeBlock,
        label: &str,
        end_label: &str,
        outer_env: &Env,
    ) -> Option<IncomingEdge> {
        self.emit_label(label);
        self.env = outer_env.clone();
        self.emit_block(block);

        if block.return_stmt.is_some() {
            None
        } else {
            self.push(format!("  br label %{}", end_label));
            Some((self.current_label.clone(), self.env.clone()))
        }
    }

    /// Reconciles variable versions at a merge block.
    ///
    /// Every variable of the outer environment whose register changed in
    /// at least one arriving arm gets a phi over all incoming edges; the
    /// phi is the variable's next SSA version. A merge nothing arrives at
    /// gets no phis at all.
    fn emit_merge_phis(&mut self, outer_env: &Env, incoming: &[IncomingEdge]) {
        if incoming.is_empty() {
            return;
        }

        let changed: Vec<String> = outer_env
            .keys()
            .filter(|name| {
                incoming
                    .iter()
                    .any(|(_, env)| env.get(*name) != outer_env.get(*name))
            })
            .cloned()
            .collect();

        for name in changed {
            let ty = self.variable_type(&name);
            let register = self.mint_register(&name);
            let operands: Vec<String> = incoming
                .iter()
                .map(|(label, env)| {
                    let value = env
                        .get(&name)
                        .unwrap_or_else(|| &outer_env[&name])
                        .clone();
                    format!("[ {}, %{} ]", value, label)
                })
                .collect();
            self.push(format!(
                "  {} = phi {} {}",
                register,
                ty.llvm_type(),
                operands.join(", ")
            ));
            self.env.insert(name, register);
        }
    }

    fn emit_while(&mut self, while_stmt: &WhileStmt) {
        let label_id = self.next_label_id();
        let cond_label = format!("while_cond_{}", label_id);
        let body_label = format!("while_body_{}", label_id);
        let end_label = format!("while_end_{}", label_id);

        let entry_label = self.current_label.clone();
        let entry_env = self.env.clone();

        // Variables the body assigns carry a value around the back edge,
        // so they get loop-header phis. The operands are only known after
        // the body is emitted; the header lines are patched in place.
        let mut carried = collect_assigned_names(&while_stmt.body);
        carried.retain(|name| entry_env.contains_key(name));

        self.push(format!("  br label %{}", cond_label));
        self.emit_label(&cond_label);

        let mut phi_slots: Vec<(usize, String, String)> = Vec::new();
        for name in &carried {
            let register = self.mint_register(name);
            phi_slots.push((self.lines.len(), name.clone(), register.clone()));
            self.lines.push(String::new());
            self.env.insert(name.clone(), register);
        }
        let header_env = self.env.clone();

        let condition = self.emit_expr(&while_stmt.condition);
        self.push(format!(
            "  br i1 {}, label %{}, label %{}",
            condition, body_label, end_label
        ));

        self.emit_label(&body_label);
        self.emit_block(&while_stmt.body);
        let body_terminated = while_stmt.body.return_stmt.is_some();
        if !body_terminated {
            self.push(format!("  br label %{}", cond_label));
        }
        let body_env = self.env.clone();
        let body_exit_label = self.current_label.clone();

        for (index, name, register) in phi_slots {
            let ty = self.variable_type(&name).llvm_type();
            let entry_value = entry_env[&name].clone();
            let mut line = format!(
                "  {} = phi {} [ {}, %{} ]",
                register, ty, entry_value, entry_label
            );
            if !body_terminated {
                let body_value = body_env.get(&name).cloned().unwrap_or(entry_value);
                line.push_str(&format!(", [ {}, %{} ]", body_value, body_exit_label));
            }
            self.lines[index] = line;
        }

        self.emit_label(&end_label);
        self.env = header_env;
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Emits an expression and returns the value it denotes: a literal
    /// text, a variable register, or a temporary.
    fn emit_expr(&mut self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Number { text } => text.clone(),
            ExprKind::Boolean { text } => {
                if text == TRUE_LITERAL {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            },
            ExprKind::Ident { name } => self.current_register(name),
            ExprKind::Unary { operand, .. } => {
                let value = self.emit_expr(operand);
                let temp = self.next_temp();
                self.push(format!("  {} = xor i1 {}, 1", temp, value));
                temp
            },
            ExprKind::Binary { left, op, right } => {
                let left_value = self.emit_expr(left);
                let right_value = self.emit_expr(right);
                let left_ty = self.expr_type(left);
                let right_ty = self.expr_type(right);

                let temp = self.next_temp();

                if op.is_comparison() {
                    let operand_ty = comparison_operand_type(left_ty, right_ty);
                    let left_value = self.promote(left_value, left_ty, operand_ty);
                    let right_value = self.promote(right_value, right_ty, operand_ty);
                    self.push(format!(
                        "  {} = {} {} {}, {}",
                        temp,
                        op.llvm_op(),
                        operand_ty.llvm_type(),
                        left_value,
                        right_value
                    ));
                } else if op.is_logical() {
                    self.push(format!(
                        "  {} = {} i1 {}, {}",
                        temp,
                        op.llvm_op(),
                        left_value,
                        right_value
                    ));
                } else {
                    let result_ty = self
                        .types
                        .get(&expr.id)
                        .copied()
                        .unwrap_or(DataType::I32);
                    let left_value = self.promote(left_value, left_ty, result_ty);
                    let right_value = self.promote(right_value, right_ty, result_ty);
                    self.push(format!(
                        "  {} = {} {} {}, {}",
                        temp,
                        op.llvm_op(),
                        result_ty.llvm_type(),
                        left_value,
                        right_value
                    ));
                }

                temp
            },
        }
    }

    /// Widens an integer value with `sext` when the target is wider;
    /// everything else passes through unchanged.
    fn promote(&mut self, value: String, from: DataType, to: DataType) -> String {
        if from == to {
            return value;
        }
        if from.is_integer() && to.is_integer() && from.bit_width() < to.bit_width() {
            let temp = self.next_temp();
            self.push(format!(
                "  {} = sext {} {} to {}",
                temp,
                from.llvm_type(),
                value,
                to.llvm_type()
            ));
            return temp;
        }
        value
    }

    // ------------------------------------------------------------------
    // State helpers
    // ------------------------------------------------------------------

    fn expr_type(&self, expr: &Expr) -> DataType {
        self.types.get(&expr.id).copied().unwrap_or(DataType::I32)
    }

    fn variable_type(&self, name: &str) -> DataType {
        self.variable_types
            .get(name)
            .copied()
            .unwrap_or(DataType::I32)
    }

    /// Mints the variable's next register: `%name` on first definition,
    /// `%name.N` afterwards.
    fn mint_register(&mut self, name: &str) -> String {
        match self.versions.get_mut(name) {
            None => {
                self.versions.insert(name.to_string(), 0);
                format!("%{}", name)
            },
            Some(version) => {
                *version += 1;
                format!("%{}.{}", name, version)
            },
        }
    }

    /// The register currently holding the variable.
    fn current_register(&self, name: &str) -> String {
        self.env
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("%{}", name))
    }

    fn next_temp(&mut self) -> String {
        let temp = format!("%_temp_{}", self.temp_counter);
        self.temp_counter += 1;
        temp
    }

    fn next_label_id(&mut self) -> u32 {
        let id = self.label_counter;
        self.label_counter += 1;
        id
    }

    fn emit_label(&mut self, label: &str) {
        self.push(format!("{}:", label));
        self.current_label = label.to_string();
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}

/// The width a comparison runs at: the wider of the two integer operand
/// types, or `i1` when both sides are boolean.
fn comparison_operand_type(left: DataType, right: DataType) -> DataType {
    [left, right]
        .into_iter()
        .filter(|ty| ty.is_integer())
        .reduce(DataType::widen)
        .unwrap_or(DataType::Bool)
}

/// Names assigned anywhere under the block, outermost first, deduped.
/// Declarations do not count: a name declared inside the block is local
/// to it and cannot carry a value around a back edge.
fn collect_assigned_names(block: &CodeBlock) -> Vec<String> {
    fn walk(statements: &[Stmt], out: &mut Vec<String>) {
        for statement in statements {
            match statement {
                Stmt::Assign(assign) => {
                    if !out.contains(&assign.name) {
                        out.push(assign.name.clone());
                    }
                },
                Stmt::If(if_stmt) => {
                    walk(&if_stmt.then_block.statements, out);
                    for elif_block in &if_stmt.elif_blocks {
                        walk(&elif_block.block.statements, out);
                    }
                    if let Some(else_block) = &if_stmt.else_block {
                        walk(&else_block.statements, out);
                    }
                },
                Stmt::While(while_stmt) => walk(&while_stmt.body.statements, out),
                Stmt::Decl(_) => {},
            }
        }
    }

    let mut out = Vec::new();
    walk(&block.statements, &mut out);
    out
}
