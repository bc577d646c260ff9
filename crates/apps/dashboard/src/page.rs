/// Single-page client. Controls are built from `/api/layout`; every change posts
/// the full set of current values to `/api/update` and swaps in the new figure.
/// A cleared date picker reads as `null` and holds the current figure.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>COVID-19 Dashboard</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
    <style>
        body { font-family: system-ui, sans-serif; margin: 0; padding: 1rem 2rem; color: #222; }
        h1 { text-align: center; font-weight: 600; }
        #controls { display: flex; flex-wrap: wrap; gap: 1.5rem; justify-content: center; margin-bottom: 1rem; }
        .control { display: flex; flex-direction: column; gap: 0.25rem; min-width: 10rem; }
        .control label { font-size: 0.85rem; color: #555; }
        .control output { font-size: 0.85rem; }
        #error { color: #b00020; text-align: center; min-height: 1.2rem; }
        .graph { width: 100%; height: 70vh; }
    </style>
</head>
<body>
    <h1 id="title"></h1>
    <div id="controls"></div>
    <div id="error"></div>
    <div id="graph" class="graph"></div>
    <script>
        const inputs = {};
        let graphId = 'graph';

        function showError(message) {
            document.getElementById('error').textContent = message || '';
        }

        function build(control) {
            const wrap = document.createElement('div');
            wrap.className = 'control';
            const label = document.createElement('label');
            label.textContent = control.label;
            label.htmlFor = control.id;
            wrap.appendChild(label);

            let el;
            let extra = null;
            if (control.kind === 'date_picker') {
                el = document.createElement('input');
                el.type = 'date';
                el.min = control.min;
                el.max = control.max;
                el.value = control.value;
                inputs[control.id] = () => el.value || null;
            } else if (control.kind === 'dropdown') {
                el = document.createElement('select');
                for (const opt of control.options) {
                    const o = document.createElement('option');
                    o.textContent = opt.label;
                    o.value = JSON.stringify(opt.value);
                    o.selected = JSON.stringify(opt.value) === JSON.stringify(control.value);
                    el.appendChild(o);
                }
                inputs[control.id] = () => JSON.parse(el.value);
            } else if (control.kind === 'slider') {
                el = document.createElement('input');
                el.type = 'range';
                el.min = control.min;
                el.max = control.max;
                el.step = control.step;
                el.value = control.value;
                const out = document.createElement('output');
                out.textContent = el.value;
                el.addEventListener('input', () => { out.textContent = el.value; });
                extra = out;
                inputs[control.id] = () => Number(el.value);
            } else {
                return null;
            }
            el.id = control.id;
            el.addEventListener('change', redraw);
            wrap.appendChild(el);
            if (extra) wrap.appendChild(extra);
            return wrap;
        }

        async function redraw() {
            const values = {};
            for (const [id, read] of Object.entries(inputs)) {
                const value = read();
                if (value === null) return;
                values[id] = value;
            }
            const resp = await fetch('/api/update', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ inputs: values }),
            });
            const body = await resp.json();
            if (!resp.ok) {
                showError(body.error);
                return;
            }
            showError('');
            Plotly.react(graphId, body.data, body.layout);
        }

        async function init() {
            try {
                const layout = await (await fetch('/api/layout')).json();
                document.title = layout.title;
                document.getElementById('title').textContent = layout.title;
                document.getElementById('graph').id = layout.graph_id;
                graphId = layout.graph_id;

                const controls = document.getElementById('controls');
                for (const control of layout.controls) {
                    const node = build(control);
                    if (node) controls.appendChild(node);
                }

                const figure = await (await fetch('/api/figure')).json();
                Plotly.newPlot(graphId, figure.data, figure.layout, { responsive: true });
            } catch (err) {
                showError('Failed to load dashboard: ' + err);
            }
        }

        init();
    </script>
</body>
</html>
"##;
